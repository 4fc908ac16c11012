//! Configuration error types.

use sight_core::ConfigurationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// The `[contract]` section does not form a valid schema contract.
    #[error("Invalid schema contract: {0}")]
    Contract(#[from] ConfigurationError),
}
