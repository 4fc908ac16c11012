//! The schema contract a staged batch is validated against.
//!
//! A contract is an ordered list of expected fields with their declared types,
//! plus the subset of fields that must never be null. It is built once when
//! the pipeline is configured and shared read-only afterwards.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;
use crate::fields;
use crate::value::FieldType;

/// A declared field: name plus primitive type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Expected fields and critical (non-nullable) fields of a staged record.
///
/// Invariant: `critical` is a subset of the declared field names, and
/// declared names are unique and non-empty. Enforced by [`Self::declare`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct SchemaContract {
    expected: Vec<FieldSpec>,
    critical: BTreeSet<String>,
}

impl SchemaContract {
    /// Build a contract.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the field list is empty, a name is
    /// blank or repeated, or a critical field is not declared.
    pub fn declare<I, C, S>(expected: I, critical: C) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = FieldSpec>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let expected: Vec<FieldSpec> = expected.into_iter().collect();
        if expected.is_empty() {
            return Err(ConfigurationError::EmptyContract);
        }

        let mut seen = BTreeSet::new();
        for spec in &expected {
            if spec.name.trim().is_empty() {
                return Err(ConfigurationError::EmptyFieldName);
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(ConfigurationError::DuplicateField(spec.name.clone()));
            }
        }

        let critical: BTreeSet<String> = critical.into_iter().map(Into::into).collect();
        if let Some(unknown) = critical.iter().find(|name| !seen.contains(name.as_str())) {
            return Err(ConfigurationError::UndeclaredCriticalField(unknown.clone()));
        }

        Ok(Self { expected, critical })
    }

    /// The bird-sightings contract: seven observation fields, with `when`,
    /// `species` and `location` critical.
    #[must_use]
    pub fn sightings() -> Self {
        let expected = fields::OBSERVATION_FIELDS.iter().map(|name| {
            let ty = if *name == fields::WHEN {
                FieldType::Timestamp
            } else {
                FieldType::String
            };
            FieldSpec::new(*name, ty)
        });

        Self {
            expected: expected.collect(),
            critical: [fields::WHEN, fields::SPECIES, fields::LOCATION]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// Declared fields in declaration order.
    #[must_use]
    pub fn expected(&self) -> &[FieldSpec] {
        &self.expected
    }

    /// Critical fields, sorted.
    #[must_use]
    pub const fn critical(&self) -> &BTreeSet<String> {
        &self.critical
    }

    #[must_use]
    pub fn expected_type(&self, name: &str) -> Option<&FieldType> {
        self.expected
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| &spec.field_type)
    }

    #[must_use]
    pub fn is_critical(&self, name: &str) -> bool {
        self.critical.contains(name)
    }
}
