use anyhow::Context;
use sight_core::FinalStore;
use sight_gate::{Gate, GateOutcome, MemoryFinal, RequiredFields};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PromoteArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `sight promote`: print only the promotion decision.
pub fn handle_promote(
    args: &PromoteArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let outcome = run_gate(args, ctx)?;
    output(&outcome.promotion, flags.format)
}

/// Handle `sight run`: print the full gate outcome.
pub fn handle_run(args: &PromoteArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let outcome = run_gate(args, ctx)?;
    output(&outcome, flags.format)
}

fn build_gate(args: &PromoteArgs, ctx: &AppContext) -> anyhow::Result<Gate> {
    let config = &ctx.config;
    let (policy, idempotency) = args.resolve(config.gate.policy, config.gate.idempotency);

    Ok(Gate::new(config.contract()?)
        .with_admissibility(RequiredFields::new(config.contract.admissible.iter().cloned()))
        .with_policy(policy)
        .with_idempotency(idempotency))
}

fn run_gate(args: &PromoteArgs, ctx: &AppContext) -> anyhow::Result<GateOutcome> {
    let gate = build_gate(args, ctx)?;
    let staging = ctx.lake.staging();
    let mut final_store = ctx.lake.final_store();

    let outcome = if args.dry_run {
        let promoted = final_store
            .promoted_batch_ids()
            .context("failed to read promoted batch ids")?;
        let mut preview = MemoryFinal::new().with_promoted_batches(promoted);
        gate.run(&staging, &mut preview)
    } else {
        gate.run(&staging, &mut final_store)
    };

    let outcome = outcome.with_context(|| {
        format!(
            "gate run from {} to {} failed",
            ctx.config.lake.staging_table, ctx.config.lake.final_table
        )
    })?;

    tracing::info!(
        policy = %outcome.policy,
        dry_run = args.dry_run,
        promoted = outcome.rows_promoted(),
        project = %ctx.project_root.display(),
        "gate run complete"
    );
    Ok(outcome)
}
