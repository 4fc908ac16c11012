//! Staged records and observed table schemas.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::contract::FieldSpec;
use crate::fields;
use crate::value::{FieldType, FieldValue};

/// One row of the staging area: field name to scalar value.
///
/// Records are read-only to the gate. A field that is absent and a field
/// holding [`FieldValue::Null`] are treated the same by null checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct StagedRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl StagedRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// True when the field is absent or explicitly null.
    #[must_use]
    pub fn is_null(&self, name: &str) -> bool {
        self.fields.get(name).is_none_or(FieldValue::is_null)
    }

    /// The row's `batch_id` rendered as text. Null, absent and empty ids
    /// are `None`; a non-text id such as `7` reads as `"7"`.
    #[must_use]
    pub fn batch_id(&self) -> Option<String> {
        self.get(fields::BATCH_ID)
            .and_then(FieldValue::render)
            .filter(|id| !id.is_empty())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy only the named fields. Names missing from this record come out
    /// as null so every projected row has the same shape.
    #[must_use]
    pub fn project(&self, names: &[&str]) -> Self {
        names
            .iter()
            .map(|name| {
                let value = self.get(name).cloned().unwrap_or(FieldValue::Null);
                ((*name).to_string(), value)
            })
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for StagedRecord {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// The column layout a staging store reports for its table, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ObservedSchema {
    columns: Vec<FieldSpec>,
}

impl ObservedSchema {
    #[must_use]
    pub const fn new(columns: Vec<FieldSpec>) -> Self {
        Self { columns }
    }

    /// Type of the named column, if present.
    #[must_use]
    pub fn field_type(&self, name: &str) -> Option<&FieldType> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.field_type)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.field_type(name).is_some()
    }

    pub fn columns(&self) -> impl Iterator<Item = &FieldSpec> {
        self.columns.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<FieldSpec> for ObservedSchema {
    fn from_iter<I: IntoIterator<Item = FieldSpec>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn absent_and_null_fields_are_both_null() {
        let record = StagedRecord::new()
            .with("species", "Turdus merula")
            .with("notes", FieldValue::Null);

        assert!(!record.is_null("species"));
        assert!(record.is_null("notes"));
        assert!(record.is_null("location"));
    }

    #[test]
    fn batch_id_ignores_empty_and_null() {
        assert_eq!(StagedRecord::new().with("batch_id", "").batch_id(), None);
        assert_eq!(
            StagedRecord::new()
                .with("batch_id", FieldValue::Null)
                .batch_id(),
            None
        );
        assert_eq!(
            StagedRecord::new().with("batch_id", "BATCH_1").batch_id(),
            Some("BATCH_1".to_string())
        );
    }

    #[test]
    fn non_text_batch_id_renders_as_text() {
        assert_eq!(
            StagedRecord::new().with("batch_id", 7_i64).batch_id(),
            Some("7".to_string())
        );
    }

    #[test]
    fn project_fills_missing_names_with_null() {
        let record = StagedRecord::new()
            .with("species", "wren")
            .with("load_timestamp", "2025-01-01T00:00:00");

        let projected = record.project(&["species", "notes"]);

        assert_eq!(
            projected,
            StagedRecord::new()
                .with("species", "wren")
                .with("notes", FieldValue::Null)
        );
    }

    #[test]
    fn observed_schema_lookup_by_name() {
        let schema: ObservedSchema = [
            FieldSpec::new("when", FieldType::Timestamp),
            FieldSpec::new("species", FieldType::String),
        ]
        .into_iter()
        .collect();

        assert_eq!(schema.field_type("when"), Some(&FieldType::Timestamp));
        assert!(!schema.contains("notes"));
        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["when", "species"]);
    }
}
