use clap::{Args, Subcommand, ValueEnum};
use sight_core::{GatePolicy, IdempotencyMode};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Validate the staging table against the schema contract.
    Validate,
    /// Report the batch provenance of the staged rows.
    Inspect,
    /// Promote admissible staged rows into the final table.
    Promote(PromoteArgs),
    /// Validate, inspect and promote in one pass over staging.
    Run(PromoteArgs),
    /// Print the JSON Schema of a command result.
    Schema(SchemaArgs),
}

/// Policy overrides shared by `promote` and `run`.
#[derive(Clone, Debug, Args)]
pub struct PromoteArgs {
    /// Whether a failed validation report blocks promotion.
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Append every admissible row even if its batch was already promoted.
    #[arg(long)]
    pub at_least_once: bool,

    /// Compute the result without writing to the final table.
    #[arg(long)]
    pub dry_run: bool,
}

impl PromoteArgs {
    /// Apply the flags on top of configured values.
    #[must_use]
    pub fn resolve(
        &self,
        policy: GatePolicy,
        idempotency: IdempotencyMode,
    ) -> (GatePolicy, IdempotencyMode) {
        let policy = self.policy.map_or(policy, GatePolicy::from);
        let idempotency = if self.at_least_once {
            IdempotencyMode::AtLeastOnce
        } else {
            idempotency
        };
        (policy, idempotency)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum PolicyArg {
    Strict,
    Lenient,
}

impl From<PolicyArg> for GatePolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Strict => Self::Strict,
            PolicyArg::Lenient => Self::Lenient,
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Result type to describe.
    #[arg(value_enum)]
    pub type_name: SchemaType,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    ValidationReport,
    Provenance,
    PromotionResult,
    GateOutcome,
    BatchSummary,
    StagedRecord,
}
