//! Schema and null-constraint validation of a staged set.
//!
//! Two independent checks feed one [`ValidationReport`]:
//! - **schema**: every declared field must be present in the staging
//!   table's schema with the declared type. Undeclared extra columns are
//!   ignored, so new columns can be added upstream without failing the gate.
//! - **nulls**: one pass over the rows counts nulls per critical field.
//!
//! The null check runs even when the schema check fails, so a single run
//! reports everything it can. Nothing here prints; callers render the report.

use std::collections::{BTreeMap, BTreeSet};

use sight_core::{
    ObservedSchema, SchemaContract, StagedRecord, StagingStore, TypeMismatch, ValidationReport,
};

use crate::GateError;

/// Compare the observed schema against the contract.
///
/// Returns `(missing_fields, type_mismatches)`.
#[must_use]
pub fn check_schema(
    observed: &ObservedSchema,
    contract: &SchemaContract,
) -> (BTreeSet<String>, BTreeMap<String, TypeMismatch>) {
    let mut missing = BTreeSet::new();
    let mut mismatches = BTreeMap::new();

    for spec in contract.expected() {
        match observed.field_type(&spec.name) {
            None => {
                missing.insert(spec.name.clone());
            }
            Some(actual) if *actual != spec.field_type => {
                mismatches.insert(
                    spec.name.clone(),
                    TypeMismatch {
                        actual: actual.clone(),
                        expected: spec.field_type.clone(),
                    },
                );
            }
            Some(_) => {}
        }
    }

    (missing, mismatches)
}

/// Count nulls per critical field in a single pass.
///
/// Returns `(null_counts, rows_checked)`. Every critical field has an entry.
pub fn count_nulls<'a, I>(records: I, contract: &SchemaContract) -> (BTreeMap<String, usize>, usize)
where
    I: IntoIterator<Item = &'a StagedRecord>,
{
    let mut counts: BTreeMap<String, usize> = contract
        .critical()
        .iter()
        .map(|field| (field.clone(), 0))
        .collect();
    let mut rows = 0;

    for record in records {
        rows += 1;
        for (field, count) in &mut counts {
            if record.is_null(field) {
                *count += 1;
            }
        }
    }

    (counts, rows)
}

/// Validate a staged set against `contract`.
///
/// `observed` is the staging table's schema description; `records` is
/// iterated exactly once. Deterministic for fixed inputs.
pub fn validate<'a, I>(
    observed: &ObservedSchema,
    records: I,
    contract: &SchemaContract,
) -> ValidationReport
where
    I: IntoIterator<Item = &'a StagedRecord>,
{
    let (missing, mismatches) = check_schema(observed, contract);
    tracing::debug!(
        missing = missing.len(),
        mismatches = mismatches.len(),
        "schema check done"
    );

    let (null_counts, rows_checked) = count_nulls(records, contract);
    tracing::debug!(rows_checked, ?null_counts, "null check done");

    let report = ValidationReport::new(missing, mismatches, null_counts, rows_checked);
    tracing::info!(
        passed = report.passed(),
        rows_checked = report.rows_checked(),
        missing = report.missing_fields().len(),
        mismatches = report.type_mismatches().len(),
        nulls = report.total_nulls(),
        "validation finished"
    );
    report
}

/// Validate straight from a staging store.
///
/// Fetches a fresh schema description and a fresh row read, once each.
///
/// # Errors
///
/// Returns [`GateError::SourceRead`] if the store cannot deliver either.
pub fn validate_store<S: StagingStore + ?Sized>(
    store: &S,
    contract: &SchemaContract,
) -> Result<ValidationReport, GateError> {
    let observed = store.describe_schema()?;
    let records = store.read_all()?;
    Ok(validate(&observed, &records, contract))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sight_core::{FieldSpec, FieldType, FieldValue};

    use super::*;

    fn three_field_contract() -> SchemaContract {
        SchemaContract::declare(
            [
                FieldSpec::new("when", FieldType::Timestamp),
                FieldSpec::new("species", FieldType::String),
                FieldSpec::new("location", FieldType::String),
            ],
            ["when", "species", "location"],
        )
        .unwrap()
    }

    fn observed(cols: &[(&str, FieldType)]) -> ObservedSchema {
        cols.iter()
            .map(|(n, t)| FieldSpec::new(*n, t.clone()))
            .collect()
    }

    #[test]
    fn extra_columns_are_ignored() {
        let schema = observed(&[
            ("when", FieldType::Timestamp),
            ("species", FieldType::String),
            ("location", FieldType::String),
            ("batch_id", FieldType::String),
        ]);
        let (missing, mismatches) = check_schema(&schema, &three_field_contract());
        assert!(missing.is_empty());
        assert!(mismatches.is_empty());
    }

    #[test]
    fn missing_and_mismatched_are_separate() {
        let schema = observed(&[
            ("when", FieldType::parse("VARCHAR")),
            ("species", FieldType::parse("VARCHAR")),
        ]);
        let (missing, mismatches) = check_schema(&schema, &three_field_contract());

        assert_eq!(missing, BTreeSet::from(["location".to_string()]));
        assert_eq!(
            mismatches,
            BTreeMap::from([(
                "when".to_string(),
                TypeMismatch {
                    actual: FieldType::String,
                    expected: FieldType::Timestamp,
                }
            )])
        );
    }

    #[test]
    fn related_but_distinct_types_are_mismatches() {
        let contract = SchemaContract::declare(
            [
                FieldSpec::new("when", FieldType::Timestamp),
                FieldSpec::new("n", FieldType::parse("BIGINT")),
            ],
            ["when"],
        )
        .unwrap();
        let schema = observed(&[
            ("when", FieldType::parse("DATETIME")),
            ("n", FieldType::parse("TINYINT")),
        ]);

        let report = validate(&schema, &Vec::<StagedRecord>::new(), &contract);

        assert!(!report.passed());
        assert_eq!(
            report
                .type_mismatches()
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>(),
            vec!["n", "when"]
        );
        assert_eq!(
            report.type_mismatches()["when"].actual,
            FieldType::Other("DATETIME".into())
        );
    }

    #[test]
    fn null_counts_include_zero_entries() {
        let records = vec![
            StagedRecord::new()
                .with("when", FieldValue::Null)
                .with("species", "wren"),
            StagedRecord::new().with("species", "wren"),
        ];
        let (counts, rows) = count_nulls(&records, &three_field_contract());

        assert_eq!(rows, 2);
        assert_eq!(
            counts,
            BTreeMap::from([
                ("location".to_string(), 2),
                ("species".to_string(), 0),
                ("when".to_string(), 2),
            ])
        );
    }

    #[test]
    fn null_check_runs_when_schema_fails() {
        let schema = observed(&[("species", FieldType::String)]);
        let records = vec![StagedRecord::new().with("species", FieldValue::Null)];

        let report = validate(&schema, &records, &three_field_contract());

        assert!(!report.schema_ok());
        assert_eq!(report.null_count("species"), 1);
        assert_eq!(report.rows_checked(), 1);
    }

    #[test]
    fn records_iterated_once() {
        let schema = observed(&[
            ("when", FieldType::Timestamp),
            ("species", FieldType::String),
            ("location", FieldType::String),
        ]);
        let records = vec![StagedRecord::new(); 4];
        let mut yielded = 0;
        let counting = records.iter().inspect(|_| yielded += 1);

        let report = validate(&schema, counting, &three_field_contract());

        assert_eq!(yielded, 4);
        assert_eq!(report.rows_checked(), 4);
    }
}
