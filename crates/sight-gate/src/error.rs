//! Gate error types.

use sight_core::{ConfigurationError, SourceReadError, StorageError};
use thiserror::Error;

/// Fatal errors that abort a gate run.
///
/// Validation findings never appear here; they are returned in the
/// [`ValidationReport`](sight_core::ValidationReport).
#[derive(Debug, Error)]
pub enum GateError {
    /// The contract or gate setup is malformed.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The staging store failed to deliver its schema or rows.
    #[error(transparent)]
    SourceRead(#[from] SourceReadError),

    /// The final store failed mid-promotion. `rows_promoted` rows were
    /// durably appended before the failure and are not rolled back.
    #[error("Promotion stopped after {rows_promoted} rows: {source}")]
    Storage {
        rows_promoted: usize,
        #[source]
        source: StorageError,
    },
}

impl GateError {
    /// Rows already in the final store when the run failed.
    #[must_use]
    pub const fn rows_promoted(&self) -> usize {
        match self {
            Self::Storage { rows_promoted, .. } => *rows_promoted,
            Self::Configuration(_) | Self::SourceRead(_) => 0,
        }
    }
}
