//! `DuckDB` lake configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Path that opens an in-memory database instead of a file.
pub const IN_MEMORY: &str = ":memory:";

/// Default database file, relative to the project root.
fn default_path() -> String {
    String::from(".sight/lake.duckdb")
}

fn default_staging_table() -> String {
    String::from("staging_bird_sightings")
}

fn default_final_table() -> String {
    String::from("bird_sightings")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LakeConfig {
    /// `DuckDB` file holding both tables, or `:memory:`.
    #[serde(default = "default_path")]
    pub path: String,

    /// Append-only table raw uploads land in.
    #[serde(default = "default_staging_table")]
    pub staging_table: String,

    /// Table admissible rows are promoted into.
    #[serde(default = "default_final_table")]
    pub final_table: String,
}

impl Default for LakeConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            staging_table: default_staging_table(),
            final_table: default_final_table(),
        }
    }
}

impl LakeConfig {
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY
    }

    /// Check that table names are plain SQL identifiers and differ.
    ///
    /// Table names are interpolated into SQL, so anything beyond
    /// `[A-Za-z_][A-Za-z0-9_]*` is refused here rather than quoted later.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_identifier("lake.staging_table", &self.staging_table)?;
        check_identifier("lake.final_table", &self.final_table)?;
        if self.staging_table == self.final_table {
            return Err(ConfigError::InvalidValue {
                field: "lake.final_table".into(),
                reason: "must differ from lake.staging_table".into(),
            });
        }
        if self.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "lake.path".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

fn check_identifier(field: &str, value: &str) -> Result<(), ConfigError> {
    let mut chars = value.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{value}' is not a plain SQL identifier"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = LakeConfig::default();
        assert_eq!(config.path, ".sight/lake.duckdb");
        assert_eq!(config.staging_table, "staging_bird_sightings");
        assert_eq!(config.final_table, "bird_sightings");
        assert!(!config.is_in_memory());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_identifier_table_names() {
        for bad in ["", "1staging", "staging; DROP TABLE x", "nature.staging", "bird-sightings"] {
            let config = LakeConfig {
                staging_table: bad.into(),
                ..LakeConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidValue { .. })),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn rejects_same_staging_and_final_table() {
        let config = LakeConfig {
            staging_table: "sightings".into(),
            final_table: "sightings".into(),
            ..LakeConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn in_memory_path_detected() {
        let config = LakeConfig {
            path: IN_MEMORY.into(),
            ..LakeConfig::default()
        };
        assert!(config.is_in_memory());
    }
}
