//! # sight-lake
//!
//! `DuckDB` storage for the Sight staging area and final store.
//!
//! ## Storage layout
//!
//! A single `DuckDB` file (default `.sight/lake.duckdb`) holds two tables:
//! - the append-only staging table raw uploads land in (`staging_bird_sightings`)
//! - the final table admissible rows are promoted into (`bird_sightings`)
//!
//! [`StagingTable`] implements [`sight_core::StagingStore`] and
//! [`FinalTable`] implements [`sight_core::FinalStore`], so the gate never
//! sees SQL.

pub mod convert;
pub mod error;
pub mod final_table;
pub mod schemas;
pub mod staging;

pub use error::LakeError;
pub use final_table::FinalTable;
pub use staging::StagingTable;

use duckdb::{Connection, params, params_from_iter};
use sight_config::LakeConfig;
use sight_core::{FieldType, StagedRecord};

/// Local `DuckDB` lake holding the staging and final tables.
pub struct SightLake {
    conn: Connection,
    staging_table: String,
    final_table: String,
}

impl SightLake {
    /// Open or create a local `DuckDB` lake file.
    ///
    /// Creates both tables if they don't exist. Table names come from
    /// `config`; `config.path` is ignored in favour of `path` so callers can
    /// resolve it against a project root first.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the file cannot be opened or schema creation fails.
    pub fn open_local(path: &str, config: &LakeConfig) -> Result<Self, LakeError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn, config)
    }

    /// Open an in-memory lake (for testing).
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if schema creation fails.
    pub fn open_in_memory(config: &LakeConfig) -> Result<Self, LakeError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, config)
    }

    fn with_connection(conn: Connection, config: &LakeConfig) -> Result<Self, LakeError> {
        let lake = Self {
            conn,
            staging_table: config.staging_table.clone(),
            final_table: config.final_table.clone(),
        };
        lake.init_schema()?;
        Ok(lake)
    }

    /// Access the underlying `DuckDB` connection.
    ///
    /// Exposed for ad-hoc queries and test fixtures. Prefer the typed
    /// table handles for standard operations.
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Handle on the configured staging table.
    #[must_use]
    pub fn staging(&self) -> StagingTable<'_> {
        StagingTable::new(&self.conn, &self.staging_table)
    }

    /// Handle on an arbitrary staging-shaped table in this lake.
    #[must_use]
    pub fn staging_table<'a>(&'a self, table: &'a str) -> StagingTable<'a> {
        StagingTable::new(&self.conn, table)
    }

    /// Handle on the configured final table.
    #[must_use]
    pub fn final_store(&self) -> FinalTable<'_> {
        FinalTable::new(&self.conn, &self.final_table)
    }

    /// Number of rows in `table`.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the count query fails.
    pub fn row_count(&self, table: &str) -> Result<usize, LakeError> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT count(*) FROM {table}"), [], |row| {
                row.get(0)
            })?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Initialize the lake schema (both tables + index).
    fn init_schema(&self) -> Result<(), LakeError> {
        self.conn
            .execute_batch(&schemas::create_staging_table(&self.staging_table))?;
        self.conn
            .execute_batch(&schemas::create_final_table(&self.final_table))?;
        tracing::debug!(
            staging = %self.staging_table,
            final_table = %self.final_table,
            "lake schema ready"
        );
        Ok(())
    }
}

/// Column layout of `table` in ordinal order.
///
/// # Errors
///
/// Returns [`LakeError::TableNotFound`] when the table has no columns in
/// `information_schema`, or [`LakeError::DuckDb`] if the query fails.
pub(crate) fn describe_table(
    conn: &Connection,
    table: &str,
) -> Result<Vec<(String, FieldType)>, LakeError> {
    let mut stmt = conn.prepare(schemas::DESCRIBE_TABLE)?;
    let columns = stmt
        .query_map(params![table], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(LakeError::TableNotFound(table.to_string()));
    }

    Ok(columns
        .into_iter()
        .map(|(name, ty)| {
            let ty = FieldType::parse(&ty);
            (name, ty)
        })
        .collect())
}

/// Insert `rows` into `table`, binding only the table columns some row uses.
///
/// Every field in every row must have a column. Runs without its own
/// transaction; callers that need atomicity wrap it.
///
/// # Errors
///
/// Returns [`LakeError::UnknownColumn`] for a field with no column, or
/// [`LakeError::DuckDb`] if an INSERT fails.
pub(crate) fn insert_rows(
    conn: &Connection,
    table: &str,
    rows: &[StagedRecord],
) -> Result<usize, LakeError> {
    if rows.is_empty() {
        return Ok(0);
    }

    let table_columns = describe_table(conn, table)?;
    for row in rows {
        if let Some(unknown) = row
            .field_names()
            .find(|name| !table_columns.iter().any(|(col, _)| col == name))
        {
            return Err(LakeError::UnknownColumn {
                table: table.to_string(),
                column: unknown.to_string(),
            });
        }
    }

    let columns: Vec<(String, FieldType)> = table_columns
        .into_iter()
        .filter(|(col, _)| rows.iter().any(|row| row.get(col).is_some()))
        .collect();

    let mut stmt = conn.prepare(&schemas::insert_statement(table, &columns))?;
    let mut inserted = 0;
    for row in rows {
        let values = columns.iter().map(|(col, _)| {
            row.get(col)
                .map_or(duckdb::types::Value::Null, convert::to_duckdb)
        });
        inserted += stmt.execute(params_from_iter(values))?;
    }
    Ok(inserted)
}
