//! `scaforge init` — create the project configuration file.

use tracing::instrument;

use scaforge_adapters::JsonConfigStore;
use scaforge_core::application::ports::ConfigStore as _;
use scaforge_core::domain::ScaforgeConfig;

use crate::{
    cli::{GlobalArgs, InitArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Create a fresh `scaforge.config.json` at the project root.
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: InitArgs,
    global: GlobalArgs,
    _config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    validate_project_name(&args.name)?;

    let project_root = global.project_root();

    // Bail early if a project already exists and --force was not given.
    if JsonConfigStore::project_exists(&project_root) && !args.force {
        return Err(CliError::ProjectExists { path: project_root });
    }

    let config = ScaforgeConfig::new(&args.name, &args.template);
    JsonConfigStore::new()
        .save(&project_root, &config)
        .map_err(CliError::Core)?;

    output.success(&format!(
        "Initialised project '{}' ({} template)",
        args.name, args.template
    ))?;
    output.print("")?;
    output.info("Add your first plugin with: scaforge add <plugin>")?;
    output.info("Browse available plugins with: scaforge list")?;

    Ok(())
}

fn validate_project_name(name: &str) -> CliResult<()> {
    if name.trim().is_empty() {
        return Err(CliError::InvalidProjectName {
            name: name.to_string(),
            reason: "name must not be empty".into(),
        });
    }
    if name.starts_with(['-', '.']) {
        return Err(CliError::InvalidProjectName {
            name: name.to_string(),
            reason: "name must start with a letter or number".into(),
        });
    }
    if name
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
    {
        return Err(CliError::InvalidProjectName {
            name: name.to_string(),
            reason: "only alphanumerics, hyphens and underscores are allowed".into(),
        });
    }
    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_names() {
        assert!(validate_project_name("my-app").is_ok());
        assert!(validate_project_name("my_app2").is_ok());
        assert!(validate_project_name("App").is_ok());
    }

    #[test]
    fn rejects_bad_names() {
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("  ").is_err());
        assert!(validate_project_name(".hidden").is_err());
        assert!(validate_project_name("-flag").is_err());
        assert!(validate_project_name("has space").is_err());
        assert!(validate_project_name("slash/y").is_err());
    }
}
