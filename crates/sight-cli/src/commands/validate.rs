use std::process::ExitCode;

use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Exit status when the report fails.
pub const FAILED_REPORT: u8 = 2;

/// Handle `sight validate`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let contract = ctx.config.contract()?;
    let report = sight_gate::validate_store(&ctx.lake.staging(), &contract).with_context(|| {
        format!(
            "failed to validate staging table {}",
            ctx.config.lake.staging_table
        )
    })?;

    output(&report, flags.format)?;

    if report.passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(FAILED_REPORT))
    }
}
