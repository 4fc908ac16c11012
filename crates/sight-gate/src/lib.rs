//! # sight-gate
//!
//! The validation-and-promotion gate between the Sight staging area and the
//! final store.
//!
//! A run has three steps, all computed from a single read of staging:
//! - [`validator`]: schema and null checks, producing a
//!   [`ValidationReport`](sight_core::ValidationReport)
//! - [`inspector`]: batch provenance of the staged set for audit output
//! - [`promotion`]: filtered, batch-idempotent copy of admissible rows
//!
//! [`Gate`] wires them together under a [`GatePolicy`](sight_core::GatePolicy).
//! Backends are reached only through [`sight_core::StagingStore`] and
//! [`sight_core::FinalStore`].

pub mod error;
pub mod inspector;
pub mod memory;
pub mod promotion;
pub mod runner;
pub mod snapshot;
pub mod validator;

pub use error::GateError;
pub use inspector::{BatchSummary, inspect, inspect_store, summarize_batches};
pub use memory::{MemoryFinal, MemoryStaging};
pub use promotion::{PromotionOptions, RequiredFields, promote, promote_records};
pub use runner::{Gate, GateOutcome, PromotionDecision};
pub use snapshot::StagedSnapshot;
pub use validator::{validate, validate_store};
