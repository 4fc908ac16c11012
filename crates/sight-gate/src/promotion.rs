//! Filtered copy of staged rows into the final store.
//!
//! Admissibility is a row-level predicate and is independent of the
//! batch-level [`ValidationReport`](sight_core::ValidationReport): a batch
//! that fails validation can still contribute its admissible rows. Whether
//! to promote at all after a failed report is the caller's decision (see
//! [`crate::Gate`]).

use std::collections::BTreeSet;

use sight_core::{FinalStore, IdempotencyMode, PromotionResult, StagedRecord, StagingStore, fields};

use crate::GateError;

/// Admissibility rule: every listed field must be non-null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredFields {
    fields: Vec<String>,
}

impl RequiredFields {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// `species`, `location` and `when` must be present.
    #[must_use]
    pub fn observations() -> Self {
        Self::new(fields::ADMISSIBLE_REQUIRED)
    }

    #[must_use]
    pub fn admits(&self, record: &StagedRecord) -> bool {
        self.fields.iter().all(|field| !record.is_null(field))
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

impl Default for RequiredFields {
    fn default() -> Self {
        Self::observations()
    }
}

/// Knobs for one promotion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionOptions {
    pub idempotency: IdempotencyMode,
    /// Columns copied into the final store.
    pub projection: Vec<String>,
}

impl Default for PromotionOptions {
    fn default() -> Self {
        Self {
            idempotency: IdempotencyMode::default(),
            projection: fields::FINAL_PROJECTION
                .iter()
                .map(|f| (*f).to_string())
                .collect(),
        }
    }
}

impl PromotionOptions {
    #[must_use]
    pub const fn with_idempotency(mut self, idempotency: IdempotencyMode) -> Self {
        self.idempotency = idempotency;
        self
    }
}

/// Read the staging store and promote its admissible rows.
///
/// # Errors
///
/// Returns [`GateError::SourceRead`] if staging cannot be read, or
/// [`GateError::Storage`] carrying the rows appended before a failed write.
pub fn promote<S, F, P>(
    source: &S,
    destination: &mut F,
    predicate: P,
    options: &PromotionOptions,
) -> Result<PromotionResult, GateError>
where
    S: StagingStore + ?Sized,
    F: FinalStore + ?Sized,
    P: Fn(&StagedRecord) -> bool,
{
    let records = source.read_all()?;
    promote_records(&records, destination, predicate, options)
}

/// Promote admissible rows from an already-read staged set.
///
/// Rows are appended one batch at a time, in first-seen batch order. With
/// [`IdempotencyMode::SkipPromotedBatches`], rows whose `batch_id` is already
/// in the destination are counted as skipped. Rows without a `batch_id`
/// cannot be matched and are always appended.
///
/// # Errors
///
/// Returns [`GateError::Storage`] if the destination cannot be queried or an
/// append fails; `rows_promoted` reports what was written before that.
pub fn promote_records<F, P>(
    records: &[StagedRecord],
    destination: &mut F,
    predicate: P,
    options: &PromotionOptions,
) -> Result<PromotionResult, GateError>
where
    F: FinalStore + ?Sized,
    P: Fn(&StagedRecord) -> bool,
{
    let already_promoted = match options.idempotency {
        IdempotencyMode::SkipPromotedBatches => destination
            .promoted_batch_ids()
            .map_err(|source| GateError::Storage {
                rows_promoted: 0,
                source,
            })?,
        IdempotencyMode::AtLeastOnce => BTreeSet::new(),
    };

    let projection: Vec<&str> = options.projection.iter().map(String::as_str).collect();
    let mut result = PromotionResult::default();
    let mut batches: Vec<(Option<String>, Vec<StagedRecord>)> = Vec::new();

    for record in records {
        if !predicate(record) {
            result.rows_rejected += 1;
            continue;
        }

        let batch_id = record.batch_id();
        if batch_id.as_ref().is_some_and(|id| already_promoted.contains(id)) {
            result.rows_skipped += 1;
            continue;
        }

        let row = record.project(&projection);
        match batches.iter_mut().find(|(id, _)| *id == batch_id) {
            Some((_, rows)) => rows.push(row),
            None => batches.push((batch_id, vec![row])),
        }
    }

    for (batch_id, rows) in &batches {
        let appended = destination
            .append_rows(rows)
            .map_err(|source| GateError::Storage {
                rows_promoted: result.rows_promoted,
                source,
            })?;
        result.rows_promoted += appended;
        tracing::debug!(batch_id = ?batch_id, rows = appended, "batch promoted");
    }

    tracing::info!(
        promoted = result.rows_promoted,
        rejected = result.rows_rejected,
        skipped = result.rows_skipped,
        "promotion finished"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sight_core::FieldValue;

    use super::*;
    use crate::memory::MemoryFinal;

    #[test]
    fn observations_rule_requires_all_three() {
        let rule = RequiredFields::observations();
        let full = StagedRecord::new()
            .with("species", "swift")
            .with("location", "Leeds")
            .with("when", "2025-05-05T05:05:05");

        assert!(rule.admits(&full));
        assert!(!rule.admits(&full.clone().with("location", FieldValue::Null)));
        assert!(!rule.admits(&StagedRecord::new().with("species", "swift")));
    }

    #[test]
    fn custom_rule() {
        let rule = RequiredFields::new(["species"]);
        assert!(rule.admits(&StagedRecord::new().with("species", "swift")));
        assert_eq!(rule.fields(), ["species".to_string()]);
    }

    #[test]
    fn default_projection_is_final_layout() {
        let options = PromotionOptions::default();
        assert_eq!(options.projection.len(), fields::FINAL_PROJECTION.len());
        assert!(options.projection.iter().any(|c| c == "batch_id"));
        assert!(!options.projection.iter().any(|c| c == "load_timestamp"));
    }

    #[test]
    fn integer_batch_id_is_skipped_on_retry() {
        let records = vec![
            StagedRecord::new()
                .with("batch_id", 7_i64)
                .with("species", "linnet")
                .with("location", "Rye")
                .with("when", "2025-03-03T03:03:03"),
        ];
        let rule = RequiredFields::observations();
        let admits = |r: &StagedRecord| rule.admits(r);
        let options = PromotionOptions::default();
        let mut destination = MemoryFinal::new();

        let first = promote_records(&records, &mut destination, admits, &options).unwrap();
        let retry = promote_records(&records, &mut destination, admits, &options).unwrap();

        assert_eq!(first.rows_promoted, 1);
        assert_eq!(retry.rows_promoted, 0);
        assert_eq!(retry.rows_skipped, 1);
        assert_eq!(destination.len(), 1);
    }
}
