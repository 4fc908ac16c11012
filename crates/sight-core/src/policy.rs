//! Caller-selectable gate policies.
//!
//! Batch-level validation and row-level promotion are separate decisions.
//! These enums let the caller choose how they combine.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GatePolicy
// ---------------------------------------------------------------------------

/// Whether a failed validation report blocks promotion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GatePolicy {
    /// Promote nothing unless the whole batch passed validation.
    Strict,
    /// Always promote the individually admissible rows.
    #[default]
    Lenient,
}

impl GatePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

impl fmt::Display for GatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// IdempotencyMode
// ---------------------------------------------------------------------------

/// How promotion treats batches the final store already holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IdempotencyMode {
    /// Skip rows whose `batch_id` is already present in the final store.
    #[default]
    SkipPromotedBatches,
    /// Append every admissible row; a retried promotion duplicates rows.
    AtLeastOnce,
}

impl IdempotencyMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SkipPromotedBatches => "skip_promoted_batches",
            Self::AtLeastOnce => "at_least_once",
        }
    }
}

impl fmt::Display for IdempotencyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
