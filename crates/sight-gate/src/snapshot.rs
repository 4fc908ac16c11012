//! Materialised view of a staging store.
//!
//! A staging source may only support one scan per read. The gate reads the
//! schema and the rows once into a [`StagedSnapshot`] and runs every check
//! against that, instead of re-querying the backend per check.

use sight_core::{ObservedSchema, SourceReadError, StagedRecord, StagingStore};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StagedSnapshot {
    schema: ObservedSchema,
    records: Vec<StagedRecord>,
}

impl StagedSnapshot {
    #[must_use]
    pub const fn new(schema: ObservedSchema, records: Vec<StagedRecord>) -> Self {
        Self { schema, records }
    }

    /// Fetch the schema description and read every row, once each.
    ///
    /// # Errors
    ///
    /// Returns [`SourceReadError`] from either call.
    pub fn capture<S: StagingStore + ?Sized>(store: &S) -> Result<Self, SourceReadError> {
        let schema = store.describe_schema()?;
        let records = store.read_all()?;
        tracing::debug!(
            columns = schema.len(),
            rows = records.len(),
            "staging snapshot captured"
        );
        Ok(Self { schema, records })
    }

    #[must_use]
    pub const fn schema(&self) -> &ObservedSchema {
        &self.schema
    }

    #[must_use]
    pub fn records(&self) -> &[StagedRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A snapshot can be re-read any number of times.
impl StagingStore for StagedSnapshot {
    fn describe_schema(&self) -> Result<ObservedSchema, SourceReadError> {
        Ok(self.schema.clone())
    }

    fn read_all(&self) -> Result<Vec<StagedRecord>, SourceReadError> {
        Ok(self.records.clone())
    }
}
