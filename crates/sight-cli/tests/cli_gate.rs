//! End-to-end runs of the `sight` binary against a seeded project lake.

use std::path::Path;
use std::process::{Command, Output};

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use sight_config::{LakeConfig, PROJECT_DIR};
use sight_core::{BatchStamp, StagedRecord, fields};
use sight_lake::SightLake;

fn sight(project: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sight"))
        .arg("--project")
        .arg(project)
        .args(args)
        .env_remove("SIGHT_LOG")
        .output()
        .expect("sight binary should run")
}

fn seeded_project(species: &[Option<&str>]) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(PROJECT_DIR)).unwrap();
    let path = dir.path().join(PROJECT_DIR).join("lake.duckdb");

    let lake = SightLake::open_local(path.to_str().unwrap(), &LakeConfig::default()).unwrap();
    let stamp = BatchStamp::with_id(
        "BATCH_MINSMERE",
        Utc.with_ymd_and_hms(2025, 6, 1, 4, 0, 0).unwrap(),
    );
    let records = species.iter().map(|s| {
        StagedRecord::new()
            .with(fields::WHEN, Utc.with_ymd_and_hms(2025, 6, 1, 3, 0, 0).unwrap())
            .with(fields::OBSERVED_BY, "tomas")
            .with(fields::SPECIES, *s)
            .with(fields::LOCATION, "Minsmere")
            .with(fields::LATITUDE, "52.25")
            .with(fields::LONGITUDE, "1.62")
            .with(fields::NOTES, Option::<&str>::None)
    });
    lake.staging().append_batch(&stamp, records).unwrap();
    dir
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be json")
}

#[test]
fn validate_exits_two_on_failed_report() {
    let project = seeded_project(&[Some("Panurus biarmicus"), None]);

    let output = sight(project.path(), &["validate"]);

    assert_eq!(output.status.code(), Some(2));
    let report = stdout_json(&output);
    assert_eq!(report["passed"], false);
    assert_eq!(report["rows_checked"], 2);
    assert_eq!(report["null_counts"]["species"], 1);
}

#[test]
fn validate_exits_zero_on_clean_staging() {
    let project = seeded_project(&[Some("Panurus biarmicus")]);

    let output = sight(project.path(), &["--format", "raw", "validate"]);

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["passed"], true);
}

#[test]
fn inspect_reports_batch() {
    let project = seeded_project(&[Some("Botaurus stellaris")]);

    let output = sight(project.path(), &["inspect"]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["provenance"]["batch_id"], "BATCH_MINSMERE");
    assert_eq!(json["batches"][0]["rows"], 1);
}

#[test]
fn dry_run_then_promote_then_retry() {
    let project = seeded_project(&[Some("Recurvirostra avosetta"), None]);

    let dry = stdout_json(&sight(project.path(), &["promote", "--dry-run"]));
    assert_eq!(dry["status"], "promoted");
    assert_eq!(dry["rows_promoted"], 1);

    let first = stdout_json(&sight(project.path(), &["promote"]));
    assert_eq!(first["rows_promoted"], 1);
    assert_eq!(first["rows_rejected"], 1);

    let retry = stdout_json(&sight(project.path(), &["promote"]));
    assert_eq!(retry["rows_promoted"], 0);
    assert_eq!(retry["rows_skipped"], 1);
}

#[test]
fn strict_run_is_blocked() {
    let project = seeded_project(&[None]);

    let output = sight(project.path(), &["run", "--policy", "strict"]);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["policy"], "strict");
    assert_eq!(json["promotion"]["status"], "blocked");
}

#[test]
fn schema_needs_no_project() {
    let dir = TempDir::new().unwrap();

    let output = sight(dir.path(), &["schema", "promotion-result"]);

    assert!(output.status.success());
    assert!(stdout_json(&output)["properties"]["rows_skipped"].is_object());
}
