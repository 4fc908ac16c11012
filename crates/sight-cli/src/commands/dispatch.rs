use std::process::ExitCode;

use crate::cli::{Commands, GlobalFlags};
use crate::commands;
use crate::context::AppContext;

/// Route a parsed command to its handler.
pub fn dispatch(
    command: &Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Validate => commands::validate::handle(ctx, flags),
        Commands::Inspect => commands::inspect::handle(ctx, flags).map(|()| ExitCode::SUCCESS),
        Commands::Promote(args) => {
            commands::promote::handle_promote(args, ctx, flags).map(|()| ExitCode::SUCCESS)
        }
        Commands::Run(args) => {
            commands::promote::handle_run(args, ctx, flags).map(|()| ExitCode::SUCCESS)
        }
        Commands::Schema(args) => {
            commands::schema::handle(args, flags).map(|()| ExitCode::SUCCESS)
        }
    }
}
