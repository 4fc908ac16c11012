//! Gate policy configuration.

use serde::{Deserialize, Serialize};
use sight_core::{GatePolicy, IdempotencyMode};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GateConfig {
    /// Whether a failed validation report blocks promotion.
    #[serde(default)]
    pub policy: GatePolicy,

    /// How already-promoted batches are treated on retry.
    #[serde(default)]
    pub idempotency: IdempotencyMode,
}
