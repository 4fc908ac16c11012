//! Staging table: the append-only landing area for raw uploads.

use duckdb::Connection;
use sight_core::{
    BatchStamp, FieldSpec, ObservedSchema, SourceReadError, StagedRecord, StagingStore,
};

use crate::{LakeError, convert, describe_table, insert_rows, schemas};

/// Read/append handle on one staging table.
pub struct StagingTable<'a> {
    conn: &'a Connection,
    table: &'a str,
}

impl<'a> StagingTable<'a> {
    pub(crate) const fn new(conn: &'a Connection, table: &'a str) -> Self {
        Self { conn, table }
    }

    #[must_use]
    pub const fn name(&self) -> &str {
        self.table
    }

    /// Append already-stamped records.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::UnknownColumn`] if a record has a field the table
    /// lacks, or [`LakeError::DuckDb`] if an INSERT fails.
    pub fn append_records(&self, records: &[StagedRecord]) -> Result<usize, LakeError> {
        let appended = insert_rows(self.conn, self.table, records)?;
        tracing::debug!(table = %self.table, rows = appended, "staged records appended");
        Ok(appended)
    }

    /// Stamp an upload with `stamp` and append it.
    ///
    /// # Errors
    ///
    /// Same as [`Self::append_records`].
    pub fn append_batch(
        &self,
        stamp: &BatchStamp,
        records: impl IntoIterator<Item = StagedRecord>,
    ) -> Result<usize, LakeError> {
        let stamped = stamp.stamp(records);
        let appended = self.append_records(&stamped)?;
        tracing::info!(
            table = %self.table,
            batch_id = %stamp.batch_id,
            rows = appended,
            "batch staged"
        );
        Ok(appended)
    }

    fn read_rows(&self) -> Result<Vec<StagedRecord>, LakeError> {
        let columns = describe_table(self.conn, self.table)?;
        let select_list = columns
            .iter()
            .map(|(name, _)| schemas::quote_ident(name))
            .collect::<Vec<_>>()
            .join(", ");

        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {select_list} FROM {}", self.table))?;
        let raw_rows = stmt
            .query_map([], |row| {
                (0..columns.len())
                    .map(|i| row.get::<_, duckdb::types::Value>(i))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw_rows
            .into_iter()
            .map(|values| {
                columns
                    .iter()
                    .zip(values)
                    .map(|((name, _), value)| {
                        convert::from_duckdb(name, value).map(|v| (name.clone(), v))
                    })
                    .collect::<Result<StagedRecord, _>>()
            })
            .collect()
    }
}

impl StagingStore for StagingTable<'_> {
    fn describe_schema(&self) -> Result<ObservedSchema, SourceReadError> {
        let columns = describe_table(self.conn, self.table)?;
        Ok(columns
            .into_iter()
            .map(|(name, ty)| FieldSpec::new(name, ty))
            .collect())
    }

    fn read_all(&self) -> Result<Vec<StagedRecord>, SourceReadError> {
        let rows = self.read_rows()?;
        tracing::debug!(table = %self.table, rows = rows.len(), "staging rows read");
        Ok(rows)
    }
}
