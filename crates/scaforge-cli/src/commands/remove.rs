//! `scaforge remove` — remove a plugin from the project.

use tracing::instrument;

use crate::{
    cli::{GlobalArgs, RemoveArgs},
    commands::build_manager,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `scaforge remove` command.
#[instrument(skip_all, fields(plugin = %args.plugin))]
pub fn execute(
    args: RemoveArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let mut manager = build_manager(&global, &config, args.skip_install)?;

    let outcome = manager.remove(&args.plugin).map_err(CliError::Core)?;

    output.success(&outcome.message)?;

    if !outcome.removed_env_vars.is_empty() {
        output.info(&format!(
            "Removed environment variables: {}",
            outcome.removed_env_vars.join(", ")
        ))?;
        output.warning("Check .env for leftover values you may want to delete")?;
    }
    output.info("Generated files were left in place; delete them manually if unwanted")?;

    Ok(())
}
