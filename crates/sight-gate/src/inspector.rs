//! Batch metadata inspection for audit reporting.
//!
//! Provenance is read from the first row as delivered by the source. Staging
//! tables have no intrinsic order, so with several batches staged the
//! reported batch is whichever the backend returns first; use
//! [`summarize_batches`] to see all of them.

use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use sight_core::provenance::UNKNOWN_BATCH_ID;
use sight_core::{BatchProvenance, FieldValue, Provenance, StagedRecord, StagingStore, fields};

use crate::GateError;

/// Row count of one staged batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct BatchSummary {
    /// `None` for rows staged without a batch id.
    pub batch_id: Option<String>,
    pub rows: usize,
}

/// Provenance of a staged set, defaulting a missing load time to now.
pub fn inspect<'a, I>(records: I) -> Provenance
where
    I: IntoIterator<Item = &'a StagedRecord>,
{
    inspect_at(records, Utc::now())
}

/// Provenance of a staged set, defaulting a missing load time to `now`.
pub fn inspect_at<'a, I>(records: I, now: DateTime<Utc>) -> Provenance
where
    I: IntoIterator<Item = &'a StagedRecord>,
{
    let Some(first) = records.into_iter().next() else {
        tracing::info!("no rows staged");
        return Provenance::NoData;
    };

    let batch_id = first.batch_id();
    let load_timestamp = present_text(first.get(fields::LOAD_TIMESTAMP));

    let provenance = BatchProvenance {
        batch_id_defaulted: batch_id.is_none(),
        load_timestamp_defaulted: load_timestamp.is_none(),
        batch_id: batch_id.unwrap_or_else(|| UNKNOWN_BATCH_ID.to_string()),
        load_timestamp: load_timestamp
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Micros, true)),
    };
    tracing::info!(
        batch_id = %provenance.batch_id,
        load_timestamp = %provenance.load_timestamp,
        "batch provenance"
    );
    Provenance::Batch(provenance)
}

/// Provenance read straight from a staging store.
///
/// # Errors
///
/// Returns [`GateError::SourceRead`] if the rows cannot be read.
pub fn inspect_store<S: StagingStore + ?Sized>(store: &S) -> Result<Provenance, GateError> {
    let records = store.read_all()?;
    Ok(inspect(&records))
}

/// Rows per batch, in first-seen order.
pub fn summarize_batches<'a, I>(records: I) -> Vec<BatchSummary>
where
    I: IntoIterator<Item = &'a StagedRecord>,
{
    let mut summaries: Vec<BatchSummary> = Vec::new();
    for record in records {
        let id = record.batch_id();
        match summaries.iter_mut().find(|s| s.batch_id == id) {
            Some(summary) => summary.rows += 1,
            None => summaries.push(BatchSummary {
                batch_id: id,
                rows: 1,
            }),
        }
    }
    summaries
}

/// Render a field for provenance, treating null and empty text as absent.
fn present_text(value: Option<&FieldValue>) -> Option<String> {
    value
        .and_then(FieldValue::render)
        .filter(|text| !text.is_empty())
}
