use schemars::{Schema, schema_for};
use sight_core::{PromotionResult, Provenance, StagedRecord, ValidationReport};
use sight_gate::{BatchSummary, GateOutcome};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::output::output;

/// Handle `sight schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_of(args.type_name), flags.format)
}

fn schema_of(type_name: SchemaType) -> Schema {
    match type_name {
        SchemaType::ValidationReport => schema_for!(ValidationReport),
        SchemaType::Provenance => schema_for!(Provenance),
        SchemaType::PromotionResult => schema_for!(PromotionResult),
        SchemaType::GateOutcome => schema_for!(GateOutcome),
        SchemaType::BatchSummary => schema_for!(BatchSummary),
        SchemaType::StagedRecord => schema_for!(StagedRecord),
    }
}
