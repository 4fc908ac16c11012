//! `DuckDB` table DDL for the staging and final tables.
//!
//! Table names come from configuration and are validated as plain SQL
//! identifiers there; column names are always double-quoted because `when`
//! is a reserved word.

use sight_core::FieldType;

/// DDL for the append-only staging table.
///
/// Observation columns mirror the sightings contract. The audit columns are
/// written by the loader: `batch_id` per upload, `load_timestamp` as
/// ISO-8601 text.
#[must_use]
pub fn create_staging_table(table: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {table} (
    "when" TIMESTAMP,
    "observed_by" VARCHAR,
    "species" VARCHAR,
    "location" VARCHAR,
    "latitude" VARCHAR,
    "longitude" VARCHAR,
    "notes" VARCHAR,
    "batch_id" VARCHAR,
    "load_timestamp" VARCHAR
);
"#
    )
}

/// DDL for the final table promoted rows are appended to.
///
/// `batch_id` is carried over from staging so retried promotions can tell
/// which batches already landed.
#[must_use]
pub fn create_final_table(table: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {table} (
    "when" TIMESTAMP,
    "observed_by" VARCHAR,
    "species" VARCHAR,
    "location" VARCHAR,
    "latitude" VARCHAR,
    "longitude" VARCHAR,
    "notes" VARCHAR,
    "batch_id" VARCHAR,
    "promoted_at" TIMESTAMP DEFAULT current_timestamp
);
CREATE INDEX IF NOT EXISTS idx_{table}_batch ON {table}("batch_id");
"#
    )
}

/// Column layout query, in ordinal order.
pub const DESCRIBE_TABLE: &str = "
SELECT column_name, data_type
FROM information_schema.columns
WHERE table_schema = 'main' AND table_name = ?
ORDER BY ordinal_position
";

/// Double-quote a column name for interpolation.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Parameterized INSERT for the given columns.
///
/// Timestamp columns take their parameter as text with a `::TIMESTAMP` cast,
/// the same way array columns are bound elsewhere in the lake.
#[must_use]
pub fn insert_statement(table: &str, columns: &[(String, FieldType)]) -> String {
    let names = columns
        .iter()
        .map(|(name, _)| quote_ident(name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = columns
        .iter()
        .map(|(_, ty)| {
            if *ty == FieldType::Timestamp {
                "?::TIMESTAMP"
            } else {
                "?"
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO {table} ({names}) VALUES ({placeholders})")
}
