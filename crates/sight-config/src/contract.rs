//! Schema contract configuration.
//!
//! ```toml
//! [contract]
//! critical = ["when", "species", "location"]
//! admissible = ["species", "location", "when"]
//!
//! [[contract.fields]]
//! name = "when"
//! type = "TIMESTAMP"
//! ```

use serde::{Deserialize, Serialize};
use sight_core::{FieldSpec, SchemaContract, fields};

use crate::ConfigError;

fn default_fields() -> Vec<FieldSpec> {
    SchemaContract::sightings().expected().to_vec()
}

fn default_critical() -> Vec<String> {
    SchemaContract::sightings().critical().iter().cloned().collect()
}

fn default_admissible() -> Vec<String> {
    fields::ADMISSIBLE_REQUIRED.iter().map(|f| (*f).to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContractConfig {
    /// Expected fields, in order.
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldSpec>,

    /// Fields that must never be null.
    #[serde(default = "default_critical")]
    pub critical: Vec<String>,

    /// Fields a row needs non-null to be promoted.
    #[serde(default = "default_admissible")]
    pub admissible: Vec<String>,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            fields: default_fields(),
            critical: default_critical(),
            admissible: default_admissible(),
        }
    }
}

impl ContractConfig {
    /// Build the schema contract this section describes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Contract`] if the fields and critical set do not
    /// form a valid contract.
    pub fn to_contract(&self) -> Result<SchemaContract, ConfigError> {
        SchemaContract::declare(self.fields.iter().cloned(), self.critical.iter().cloned())
            .map_err(ConfigError::from)
    }

    /// Check the admissibility field list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the list is empty or names a
    /// blank field.
    pub fn validate_admissible(&self) -> Result<(), ConfigError> {
        if self.admissible.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "contract.admissible".into(),
                reason: "must name at least one field".into(),
            });
        }
        if self.admissible.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "contract.admissible".into(),
                reason: "field names must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sight_core::{ConfigurationError, FieldType};

    use super::*;

    #[test]
    fn default_builds_sightings_contract() {
        let contract = ContractConfig::default().to_contract().unwrap();
        assert_eq!(contract, SchemaContract::sightings());
    }

    #[test]
    fn undeclared_critical_field_is_a_contract_error() {
        let config = ContractConfig {
            fields: vec![FieldSpec::new("species", FieldType::String)],
            critical: vec!["location".into()],
            ..ContractConfig::default()
        };
        let err = config.to_contract().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Contract(ConfigurationError::UndeclaredCriticalField(ref f)) if f == "location"
        ));
    }

    #[test]
    fn empty_admissible_list_rejected() {
        let config = ContractConfig {
            admissible: Vec::new(),
            ..ContractConfig::default()
        };
        assert!(config.validate_admissible().is_err());
        assert!(ContractConfig::default().validate_admissible().is_ok());
    }
}
