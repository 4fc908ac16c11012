//! Structured validation findings.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::Serialize;

use crate::value::FieldType;

/// A declared field whose observed type differs from the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct TypeMismatch {
    pub actual: FieldType,
    pub expected: FieldType,
}

/// Result of one validation run over a staged set.
///
/// Built once per run and never mutated. `passed` is derived at construction:
/// no missing fields, no type mismatches, and zero nulls across all critical
/// fields. Collections are ordered so the serialized form is reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ValidationReport {
    missing_fields: BTreeSet<String>,
    type_mismatches: BTreeMap<String, TypeMismatch>,
    null_counts: BTreeMap<String, usize>,
    rows_checked: usize,
    passed: bool,
}

impl ValidationReport {
    #[must_use]
    pub fn new(
        missing_fields: BTreeSet<String>,
        type_mismatches: BTreeMap<String, TypeMismatch>,
        null_counts: BTreeMap<String, usize>,
        rows_checked: usize,
    ) -> Self {
        let passed = missing_fields.is_empty()
            && type_mismatches.is_empty()
            && null_counts.values().all(|&n| n == 0);
        Self {
            missing_fields,
            type_mismatches,
            null_counts,
            rows_checked,
            passed,
        }
    }

    #[must_use]
    pub const fn passed(&self) -> bool {
        self.passed
    }

    /// True when the schema half of the check found nothing.
    #[must_use]
    pub fn schema_ok(&self) -> bool {
        self.missing_fields.is_empty() && self.type_mismatches.is_empty()
    }

    /// True when no critical field was null in any row.
    #[must_use]
    pub fn nulls_ok(&self) -> bool {
        self.total_nulls() == 0
    }

    #[must_use]
    pub const fn missing_fields(&self) -> &BTreeSet<String> {
        &self.missing_fields
    }

    #[must_use]
    pub const fn type_mismatches(&self) -> &BTreeMap<String, TypeMismatch> {
        &self.type_mismatches
    }

    /// Null occurrences per critical field. Every critical field has an
    /// entry, including those with zero nulls.
    #[must_use]
    pub const fn null_counts(&self) -> &BTreeMap<String, usize> {
        &self.null_counts
    }

    /// Null count for one field; zero for fields that are not critical.
    #[must_use]
    pub fn null_count(&self, field: &str) -> usize {
        self.null_counts.get(field).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_nulls(&self) -> usize {
        self.null_counts.values().sum()
    }

    #[must_use]
    pub const fn rows_checked(&self) -> usize {
        self.rows_checked
    }
}
