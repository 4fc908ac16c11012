//! # sight-core
//!
//! Core types for the Sight staging-to-final promotion gate.
//!
//! This crate provides the foundational types shared across all Sight crates:
//! - Scalar field values and normalised storage types
//! - Staged records and observed table schemas
//! - The schema contract (expected fields, critical fields)
//! - Structured gate results (validation report, batch provenance, promotion result)
//! - Batch stamping for audit fields
//! - Caller-selectable gate and idempotency policies
//! - The error taxonomy and the storage collaborator traits

pub mod contract;
pub mod errors;
pub mod fields;
pub mod policy;
pub mod promotion;
pub mod provenance;
pub mod record;
pub mod report;
pub mod store;
pub mod value;

pub use contract::{FieldSpec, SchemaContract};
pub use errors::{ConfigurationError, SourceReadError, StampError, StorageError};
pub use policy::{GatePolicy, IdempotencyMode};
pub use promotion::PromotionResult;
pub use provenance::{BatchProvenance, BatchStamp, Provenance};
pub use record::{ObservedSchema, StagedRecord};
pub use report::{TypeMismatch, ValidationReport};
pub use store::{FinalStore, StagingStore};
pub use value::{FieldType, FieldValue};
