//! One full gate run: snapshot, validate, inspect, promote.

use schemars::JsonSchema;
use serde::Serialize;
use sight_core::{
    FinalStore, GatePolicy, IdempotencyMode, PromotionResult, Provenance, SchemaContract,
    StagingStore, ValidationReport,
};

use crate::GateError;
use crate::inspector::{self, BatchSummary};
use crate::promotion::{self, PromotionOptions, RequiredFields};
use crate::snapshot::StagedSnapshot;
use crate::validator;

/// What happened to the promotion step of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PromotionDecision {
    Promoted(PromotionResult),
    /// Nothing was written.
    Blocked { reason: String },
}

impl PromotionDecision {
    #[must_use]
    pub const fn result(&self) -> Option<&PromotionResult> {
        match self {
            Self::Promoted(result) => Some(result),
            Self::Blocked { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// Everything one gate run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct GateOutcome {
    pub policy: GatePolicy,
    pub report: ValidationReport,
    pub provenance: Provenance,
    pub batches: Vec<BatchSummary>,
    pub promotion: PromotionDecision,
}

impl GateOutcome {
    /// Rows appended to the final store, zero if blocked.
    #[must_use]
    pub fn rows_promoted(&self) -> usize {
        self.promotion.result().map_or(0, |r| r.rows_promoted)
    }
}

/// Gate configuration: contract, admissibility rule and policies.
#[derive(Debug, Clone)]
pub struct Gate {
    contract: SchemaContract,
    admissibility: RequiredFields,
    policy: GatePolicy,
    options: PromotionOptions,
}

impl Gate {
    #[must_use]
    pub fn new(contract: SchemaContract) -> Self {
        Self {
            contract,
            admissibility: RequiredFields::observations(),
            policy: GatePolicy::default(),
            options: PromotionOptions::default(),
        }
    }

    /// The bird-sightings contract with default policies.
    #[must_use]
    pub fn sightings() -> Self {
        Self::new(SchemaContract::sightings())
    }

    #[must_use]
    pub fn with_policy(mut self, policy: GatePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_idempotency(mut self, idempotency: IdempotencyMode) -> Self {
        self.options.idempotency = idempotency;
        self
    }

    #[must_use]
    pub fn with_admissibility(mut self, admissibility: RequiredFields) -> Self {
        self.admissibility = admissibility;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: PromotionOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn contract(&self) -> &SchemaContract {
        &self.contract
    }

    #[must_use]
    pub const fn policy(&self) -> GatePolicy {
        self.policy
    }

    #[must_use]
    pub const fn admissibility(&self) -> &RequiredFields {
        &self.admissibility
    }

    #[must_use]
    pub const fn options(&self) -> &PromotionOptions {
        &self.options
    }

    /// Run the gate against `staging`, appending into `destination`.
    ///
    /// Staging is read exactly once. Under [`GatePolicy::Strict`] a failed
    /// report blocks promotion; under [`GatePolicy::Lenient`] admissible rows
    /// are promoted regardless.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::SourceRead`] if staging cannot be read, or
    /// [`GateError::Storage`] if the final store fails mid-promotion.
    pub fn run<S, F>(&self, staging: &S, destination: &mut F) -> Result<GateOutcome, GateError>
    where
        S: StagingStore + ?Sized,
        F: FinalStore + ?Sized,
    {
        let snapshot = StagedSnapshot::capture(staging)?;

        let report = validator::validate(snapshot.schema(), snapshot.records(), &self.contract);
        let provenance = inspector::inspect(snapshot.records());
        let batches = inspector::summarize_batches(snapshot.records());

        let promotion = if self.policy == GatePolicy::Strict && !report.passed() {
            let reason = blocked_reason(&report);
            tracing::warn!(policy = %self.policy, %reason, "promotion blocked");
            PromotionDecision::Blocked { reason }
        } else {
            let admissibility = &self.admissibility;
            let result = promotion::promote_records(
                snapshot.records(),
                destination,
                |record| admissibility.admits(record),
                &self.options,
            )?;
            PromotionDecision::Promoted(result)
        };

        Ok(GateOutcome {
            policy: self.policy,
            report,
            provenance,
            batches,
            promotion,
        })
    }
}

fn blocked_reason(report: &ValidationReport) -> String {
    let mut parts = Vec::new();
    if !report.missing_fields().is_empty() {
        parts.push(format!("{} missing field(s)", report.missing_fields().len()));
    }
    if !report.type_mismatches().is_empty() {
        parts.push(format!(
            "{} type mismatch(es)",
            report.type_mismatches().len()
        ));
    }
    if !report.nulls_ok() {
        parts.push(format!(
            "{} null(s) in critical fields",
            report.total_nulls()
        ));
    }
    format!("validation failed: {}", parts.join(", "))
}
