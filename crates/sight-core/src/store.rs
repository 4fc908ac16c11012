//! Storage collaborator seams.
//!
//! The gate never talks to a backend directly. Staging and final stores are
//! consumed through these traits; `sight-lake` implements them over `DuckDB`
//! and `sight-gate` ships in-memory versions for tests.
//!
//! All calls are blocking from the gate's point of view. Timeouts and retries
//! belong to the implementation or its caller.

use std::collections::BTreeSet;

use crate::errors::{SourceReadError, StorageError};
use crate::record::{ObservedSchema, StagedRecord};

/// Read side: the append-only staging area.
pub trait StagingStore {
    /// Describe the staging table's columns and their types.
    ///
    /// # Errors
    ///
    /// Returns [`SourceReadError`] if the schema cannot be fetched.
    fn describe_schema(&self) -> Result<ObservedSchema, SourceReadError>;

    /// Read every staged row, in the order the backend delivers them.
    ///
    /// Each call is a fresh scan. Implementations over single-pass cursors
    /// may fail a second call with [`SourceReadError::Exhausted`].
    ///
    /// # Errors
    ///
    /// Returns [`SourceReadError`] if the rows cannot be read.
    fn read_all(&self) -> Result<Vec<StagedRecord>, SourceReadError>;
}

/// Write side: the final store promoted rows are appended to.
pub trait FinalStore {
    /// Append rows and return how many were written.
    ///
    /// Implementations should make one call atomic where the backend allows.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the append fails.
    fn append_rows(&mut self, rows: &[StagedRecord]) -> Result<usize, StorageError>;

    /// Batch ids already present in the store.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store cannot be queried.
    fn promoted_batch_ids(&self) -> Result<BTreeSet<String>, StorageError>;
}

impl<T: StagingStore + ?Sized> StagingStore for &T {
    fn describe_schema(&self) -> Result<ObservedSchema, SourceReadError> {
        (**self).describe_schema()
    }

    fn read_all(&self) -> Result<Vec<StagedRecord>, SourceReadError> {
        (**self).read_all()
    }
}

impl<T: FinalStore + ?Sized> FinalStore for &mut T {
    fn append_rows(&mut self, rows: &[StagedRecord]) -> Result<usize, StorageError> {
        (**self).append_rows(rows)
    }

    fn promoted_batch_ids(&self) -> Result<BTreeSet<String>, StorageError> {
        (**self).promoted_batch_ids()
    }
}
