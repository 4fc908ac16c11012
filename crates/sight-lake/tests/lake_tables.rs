//! Staging and final table behaviour against real `DuckDB` databases.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use sight_config::LakeConfig;
use sight_core::{
    BatchStamp, FieldType, FieldValue, FinalStore, SourceReadError, StagedRecord, StagingStore,
    fields,
};
use sight_lake::SightLake;

fn lake() -> SightLake {
    SightLake::open_in_memory(&LakeConfig::default()).unwrap()
}

fn sighting(species: Option<&str>, location: Option<&str>) -> StagedRecord {
    StagedRecord::new()
        .with(
            fields::WHEN,
            Utc.with_ymd_and_hms(2025, 4, 12, 6, 45, 0).unwrap(),
        )
        .with(fields::OBSERVED_BY, "colin")
        .with(fields::SPECIES, species)
        .with(fields::LOCATION, location)
        .with(fields::LATITUDE, "53.48")
        .with(fields::LONGITUDE, "-2.24")
        .with(fields::NOTES, Option::<&str>::None)
}

#[test]
fn staged_batch_reads_back_with_audit_fields() {
    let lake = lake();
    let stamp = BatchStamp::at(Utc.with_ymd_and_hms(2025, 4, 12, 8, 0, 0).unwrap()).unwrap();

    let appended = lake
        .staging()
        .append_batch(
            &stamp,
            vec![
                sighting(Some("Pica pica"), Some("Salford")),
                sighting(None, Some("Bolton")),
            ],
        )
        .unwrap();
    assert_eq!(appended, 2);

    let rows = lake.staging().read_all().unwrap();
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.batch_id(), Some(stamp.batch_id.clone()));
        assert_eq!(
            row.get(fields::LOAD_TIMESTAMP).and_then(FieldValue::as_text),
            Some("2025-04-12T08:00:00.000000Z")
        );
        assert_eq!(
            row.get(fields::WHEN),
            Some(&FieldValue::Timestamp(
                Utc.with_ymd_and_hms(2025, 4, 12, 6, 45, 0).unwrap()
            ))
        );
        assert!(row.is_null(fields::NOTES));
    }
    assert_eq!(
        rows.iter().filter(|r| r.is_null(fields::SPECIES)).count(),
        1
    );
}

#[test]
fn describe_schema_uses_normalised_types() {
    let lake = lake();
    let schema = lake.staging().describe_schema().unwrap();

    assert_eq!(schema.field_type("when"), Some(&FieldType::Timestamp));
    assert_eq!(schema.field_type("notes"), Some(&FieldType::String));
    assert_eq!(schema.field_type("load_timestamp"), Some(&FieldType::String));
}

#[test]
fn missing_staging_table_is_a_source_error() {
    let lake = lake();
    let err = lake.staging_table("not_there").read_all().unwrap_err();
    assert!(matches!(err, SourceReadError::TableNotFound(ref t) if t == "not_there"));
}

#[test]
fn custom_staging_table_without_notes() {
    let lake = lake();
    lake.conn()
        .execute_batch(
            r#"CREATE TABLE staging_partial ("when" TIMESTAMP, "species" VARCHAR, "location" VARCHAR)"#,
        )
        .unwrap();

    let schema = lake.staging_table("staging_partial").describe_schema().unwrap();
    assert_eq!(
        schema.names().collect::<Vec<_>>(),
        vec!["when", "species", "location"]
    );
    assert!(lake.staging_table("staging_partial").read_all().unwrap().is_empty());
}

#[test]
fn final_append_tracks_batch_ids() {
    let lake = lake();
    let mut dest = lake.final_store();

    let rows = vec![
        sighting(Some("Corvus corax"), Some("Ilkley"))
            .project(&fields::FINAL_PROJECTION)
            .with(fields::BATCH_ID, "BATCH_A"),
        sighting(Some("Bubo bubo"), Some("Ilkley"))
            .project(&fields::FINAL_PROJECTION)
            .with(fields::BATCH_ID, "BATCH_B"),
        sighting(Some("Strix aluco"), Some("Otley")).project(&fields::FINAL_PROJECTION),
    ];

    assert_eq!(dest.append_rows(&rows).unwrap(), 3);
    assert_eq!(lake.row_count("bird_sightings").unwrap(), 3);
    assert_eq!(
        dest.promoted_batch_ids().unwrap().into_iter().collect::<Vec<_>>(),
        vec!["BATCH_A".to_string(), "BATCH_B".to_string()]
    );
}

#[test]
fn failed_final_append_rolls_back() {
    let lake = lake();
    let mut dest = lake.final_store();

    let rows = vec![
        sighting(Some("Corvus corax"), Some("Ilkley")).project(&fields::FINAL_PROJECTION),
        sighting(Some("Bubo bubo"), Some("Ilkley"))
            .project(&fields::FINAL_PROJECTION)
            .with(fields::WHEN, "not a timestamp"),
    ];

    assert!(dest.append_rows(&rows).is_err());
    assert_eq!(lake.row_count("bird_sightings").unwrap(), 0);
}

#[test]
fn unknown_column_is_rejected_not_backend() {
    let lake = lake();
    let mut dest = lake.final_store();

    let rows = vec![sighting(Some("Bubo bubo"), Some("Ilkley")).with("habitat", "moor")];

    let err = dest.append_rows(&rows).unwrap_err();
    assert!(matches!(err, sight_core::StorageError::Rejected(_)));
}

#[test]
fn on_disk_lake_persists_across_opens() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lake.duckdb");
    let path = path.to_str().unwrap();
    let config = LakeConfig::default();

    {
        let lake = SightLake::open_local(path, &config).unwrap();
        let stamp = BatchStamp::with_id(
            "BATCH_NEW_YEAR",
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        );
        lake.staging()
            .append_batch(
                &stamp,
                vec![sighting(Some("Alcedo atthis"), Some("Wharfe"))],
            )
            .unwrap();
    }

    let reopened = SightLake::open_local(path, &config).unwrap();
    let rows = reopened.staging().read_all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].batch_id().as_deref(), Some("BATCH_NEW_YEAR"));
}
