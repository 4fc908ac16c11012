//! In-memory staging and final stores.
//!
//! Used by tests and by dry runs, where promotion is computed against a copy
//! of the final store's batch ids without writing anything.

use std::cell::Cell;
use std::collections::BTreeSet;

use sight_core::{
    FieldSpec, FinalStore, ObservedSchema, SchemaContract, SourceReadError, StagedRecord,
    StagingStore, StorageError,
};

/// Staging rows held in a `Vec`.
#[derive(Debug, Default)]
pub struct MemoryStaging {
    schema: ObservedSchema,
    records: Vec<StagedRecord>,
    single_pass: bool,
    failure: Option<String>,
    reads: Cell<usize>,
}

impl MemoryStaging {
    #[must_use]
    pub fn new(schema: ObservedSchema, records: Vec<StagedRecord>) -> Self {
        Self {
            schema,
            records,
            ..Self::default()
        }
    }

    /// Staging whose schema is exactly what `contract` expects.
    #[must_use]
    pub fn from_contract(contract: &SchemaContract, records: Vec<StagedRecord>) -> Self {
        let schema: ObservedSchema = contract.expected().iter().cloned().collect();
        Self::new(schema, records)
    }

    /// Add a column to the described schema.
    #[must_use]
    pub fn with_column(mut self, spec: FieldSpec) -> Self {
        let mut columns: Vec<FieldSpec> = self.schema.columns().cloned().collect();
        columns.push(spec);
        self.schema = ObservedSchema::new(columns);
        self
    }

    /// Behave like a forward-only cursor: a second `read_all` fails.
    #[must_use]
    pub const fn single_pass(mut self) -> Self {
        self.single_pass = true;
        self
    }

    /// Fail every read with a backend error carrying `message`.
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// How many times `read_all` has been called.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl StagingStore for MemoryStaging {
    fn describe_schema(&self) -> Result<ObservedSchema, SourceReadError> {
        if let Some(message) = &self.failure {
            return Err(SourceReadError::Backend(message.clone().into()));
        }
        Ok(self.schema.clone())
    }

    fn read_all(&self) -> Result<Vec<StagedRecord>, SourceReadError> {
        if let Some(message) = &self.failure {
            return Err(SourceReadError::Backend(message.clone().into()));
        }
        let reads = self.reads.get() + 1;
        self.reads.set(reads);
        if self.single_pass && reads > 1 {
            return Err(SourceReadError::Exhausted);
        }
        Ok(self.records.clone())
    }
}

/// Final rows held in a `Vec`.
#[derive(Debug, Default)]
pub struct MemoryFinal {
    rows: Vec<StagedRecord>,
    seeded_batches: BTreeSet<String>,
    fail_on_append: Option<usize>,
    appends: usize,
}

impl MemoryFinal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend these batches were promoted by an earlier run.
    #[must_use]
    pub fn with_promoted_batches<I, S>(mut self, batch_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seeded_batches
            .extend(batch_ids.into_iter().map(Into::into));
        self
    }

    /// Reject the `nth` append call (1-based) and every call after it.
    #[must_use]
    pub const fn failing_on_append(mut self, nth: usize) -> Self {
        self.fail_on_append = Some(nth);
        self
    }

    #[must_use]
    pub fn rows(&self) -> &[StagedRecord] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FinalStore for MemoryFinal {
    fn append_rows(&mut self, rows: &[StagedRecord]) -> Result<usize, StorageError> {
        self.appends += 1;
        if self.fail_on_append.is_some_and(|nth| self.appends >= nth) {
            return Err(StorageError::Rejected(format!(
                "append {} refused",
                self.appends
            )));
        }
        self.rows.extend_from_slice(rows);
        Ok(rows.len())
    }

    fn promoted_batch_ids(&self) -> Result<BTreeSet<String>, StorageError> {
        let mut ids = self.seeded_batches.clone();
        ids.extend(self.rows.iter().filter_map(StagedRecord::batch_id));
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pass_staging_refuses_second_read() {
        let staging = MemoryStaging::default().single_pass();
        assert!(staging.read_all().is_ok());
        assert!(matches!(
            staging.read_all(),
            Err(SourceReadError::Exhausted)
        ));
        assert_eq!(staging.reads(), 2);
    }

    #[test]
    fn final_batch_ids_include_seeded_and_appended() {
        let mut store = MemoryFinal::new().with_promoted_batches(["OLD"]);
        store
            .append_rows(&[StagedRecord::new().with("batch_id", "NEW"), StagedRecord::new()])
            .unwrap();

        assert_eq!(
            store.promoted_batch_ids().unwrap(),
            BTreeSet::from(["NEW".to_string(), "OLD".to_string()])
        );
        assert_eq!(store.len(), 2);
    }
}
