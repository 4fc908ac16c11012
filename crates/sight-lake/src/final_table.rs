//! Final table: the append-only destination of promoted rows.

use std::collections::BTreeSet;

use duckdb::Connection;
use sight_core::{FinalStore, StagedRecord, StorageError, fields};

use crate::{LakeError, insert_rows, schemas};

/// Append handle on one final table.
pub struct FinalTable<'a> {
    conn: &'a Connection,
    table: &'a str,
}

impl<'a> FinalTable<'a> {
    pub(crate) const fn new(conn: &'a Connection, table: &'a str) -> Self {
        Self { conn, table }
    }

    #[must_use]
    pub const fn name(&self) -> &str {
        self.table
    }

    /// Append `rows` in one transaction. Nothing is written if any row fails.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError`] from the failing INSERT or COMMIT; the
    /// transaction has been rolled back by then.
    pub fn append_atomic(&self, rows: &[StagedRecord]) -> Result<usize, LakeError> {
        if rows.is_empty() {
            return Ok(0);
        }
        self.in_transaction(|conn| insert_rows(conn, self.table, rows))
    }

    /// Run `work` between BEGIN and COMMIT, rolling back if either fails.
    fn in_transaction<T>(
        &self,
        work: impl FnOnce(&Connection) -> Result<T, LakeError>,
    ) -> Result<T, LakeError> {
        self.conn.execute_batch("BEGIN TRANSACTION")?;
        let result = work(self.conn).and_then(|value| {
            self.conn.execute_batch("COMMIT")?;
            Ok(value)
        });
        if result.is_err() {
            self.rollback();
        }
        result
    }

    fn rollback(&self) {
        if let Err(rollback) = self.conn.execute_batch("ROLLBACK") {
            tracing::warn!(
                table = %self.table,
                %rollback,
                "rollback after failed append also failed"
            );
        }
    }

    fn distinct_batch_ids(&self) -> Result<BTreeSet<String>, LakeError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT DISTINCT {col} FROM {table} WHERE {col} IS NOT NULL",
            col = schemas::quote_ident(fields::BATCH_ID),
            table = self.table,
        ))?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(ids)
    }
}

impl FinalStore for FinalTable<'_> {
    fn append_rows(&mut self, rows: &[StagedRecord]) -> Result<usize, StorageError> {
        let appended = self.append_atomic(rows)?;
        tracing::debug!(table = %self.table, rows = appended, "final rows appended");
        Ok(appended)
    }

    fn promoted_batch_ids(&self) -> Result<BTreeSet<String>, StorageError> {
        Ok(self.distinct_batch_ids()?)
    }
}
