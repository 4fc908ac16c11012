use anyhow::Context;
use serde::Serialize;
use sight_core::Provenance;
use sight_gate::{BatchSummary, StagedSnapshot, inspect, summarize_batches};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InspectResponse {
    provenance: Provenance,
    batches: Vec<BatchSummary>,
}

/// Handle `sight inspect`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let snapshot = StagedSnapshot::capture(&ctx.lake.staging())
        .context("failed to read staging table")?;

    let response = InspectResponse {
        provenance: inspect(snapshot.records()),
        batches: summarize_batches(snapshot.records()),
    };
    output(&response, flags.format)
}
