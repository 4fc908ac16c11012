//! Error taxonomy shared by the gate and its storage collaborators.
//!
//! Validation findings (missing fields, type mismatches, null violations) are
//! not errors; they are data returned in a
//! [`ValidationReport`](crate::ValidationReport). The types here cover faults
//! that abort a run.

use thiserror::Error;

/// Boxed backend error carried by the storage error variants.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// A malformed schema contract or gate configuration. Fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A critical field is not among the declared fields.
    #[error("Critical field '{0}' is not declared in the schema contract")]
    UndeclaredCriticalField(String),

    /// The same field name was declared twice.
    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),

    /// The contract declares no fields at all.
    #[error("Schema contract declares no fields")]
    EmptyContract,

    /// A field name is blank.
    #[error("Field names must not be empty")]
    EmptyFieldName,
}

/// The staging collaborator failed to deliver its schema or rows.
#[derive(Debug, Error)]
pub enum SourceReadError {
    /// The staging table does not exist.
    #[error("Staging table not found: {0}")]
    TableNotFound(String),

    /// A column held a value the gate cannot represent.
    #[error("Unsupported value in column '{column}': {kind}")]
    UnsupportedValue { column: String, kind: String },

    /// A single-pass source was asked for a second scan.
    #[error("Staging source already consumed")]
    Exhausted,

    /// Underlying backend failure.
    #[error("Staging read failed: {0}")]
    Backend(#[source] BackendError),
}

/// The final store failed to accept promoted rows.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The final table does not exist.
    #[error("Final table not found: {0}")]
    TableNotFound(String),

    /// The store refused the append.
    #[error("Append rejected: {0}")]
    Rejected(String),

    /// Underlying backend failure.
    #[error("Final store write failed: {0}")]
    Backend(#[source] BackendError),
}

/// The OS random source could not supply a batch id suffix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to generate batch id suffix: {0}")]
pub struct StampError(pub String);
