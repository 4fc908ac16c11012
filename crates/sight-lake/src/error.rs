//! Lake error types.

use sight_core::{SourceReadError, StorageError};

/// Errors that can occur in the `DuckDB` lake storage layer.
#[derive(Debug, thiserror::Error)]
pub enum LakeError {
    /// `DuckDB` operation failed.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// The named table does not exist.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// A record carries a field the target table has no column for.
    #[error("Table '{table}' has no column '{column}'")]
    UnknownColumn {
        /// Target table.
        table: String,
        /// Offending field name.
        column: String,
    },

    /// A stored value has no [`sight_core::FieldValue`] representation.
    #[error("Unsupported value in column '{column}': {kind}")]
    UnsupportedValue {
        /// Column the value was read from.
        column: String,
        /// Debug rendering of the `DuckDB` value.
        kind: String,
    },
}

impl From<LakeError> for SourceReadError {
    fn from(error: LakeError) -> Self {
        match error {
            LakeError::TableNotFound(table) => Self::TableNotFound(table),
            LakeError::UnsupportedValue { column, kind } => Self::UnsupportedValue { column, kind },
            other => Self::Backend(Box::new(other)),
        }
    }
}

impl From<LakeError> for StorageError {
    fn from(error: LakeError) -> Self {
        match error {
            LakeError::TableNotFound(table) => Self::TableNotFound(table),
            LakeError::UnknownColumn { .. } => Self::Rejected(error.to_string()),
            other => Self::Backend(Box::new(other)),
        }
    }
}
