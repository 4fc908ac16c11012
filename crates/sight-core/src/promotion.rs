//! Promotion outcome counts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Row counts from one promotion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PromotionResult {
    /// Rows appended to the final store.
    pub rows_promoted: usize,
    /// Rows that failed the admissibility predicate.
    pub rows_rejected: usize,
    /// Admissible rows not appended because their batch was already promoted.
    pub rows_skipped: usize,
}

impl PromotionResult {
    /// Total rows the engine looked at.
    #[must_use]
    pub const fn rows_considered(&self) -> usize {
        self.rows_promoted + self.rows_rejected + self.rows_skipped
    }
}
