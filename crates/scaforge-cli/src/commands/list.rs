//! Implementation of the `scaforge list` command.

use scaforge_adapters::JsonConfigStore;
use scaforge_core::application::ports::ConfigStore as _;
use scaforge_core::domain::{PluginCategory, PluginDefinition, ScaforgeConfig};

use crate::{
    cli::{GlobalArgs, ListArgs, ListFormat},
    commands::builtin_registry,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: ListArgs,
    global: GlobalArgs,
    _config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let registry = builtin_registry()?;

    let category = args
        .category
        .as_deref()
        .map(|c| {
            c.parse::<PluginCategory>().map_err(|_| {
                let known: Vec<String> = registry
                    .get_categories()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                CliError::InvalidInput {
                    message: format!(
                        "'{c}' is not a category (expected one of: {})",
                        known.join(", ")
                    ),
                }
            })
        })
        .transpose()?;

    // The project configuration is optional for plain listings, but
    // --installed is meaningless without one.
    let project = JsonConfigStore::new().load(&global.project_root()).ok();
    if args.installed && project.is_none() {
        return Err(CliError::InvalidInput {
            message: "--installed requires a scaforge project (run `scaforge init` first)".into(),
        });
    }

    let catalog = match category {
        Some(c) => registry.get_by_category(c),
        None => registry.get_all(),
    };
    let plugins: Vec<&PluginDefinition> = catalog
        .into_iter()
        .filter(|def| {
            !args.installed
                || project
                    .as_ref()
                    .is_some_and(|p| p.is_installed(&def.name))
        })
        .collect();

    match args.format {
        ListFormat::Table => {
            let title = if args.installed {
                "Installed plugins:"
            } else {
                "Available plugins:"
            };
            output.header(title)?;
            for def in &plugins {
                let marker = installed_marker(project.as_ref(), def);
                output.print(&format!(
                    "  {}{:<14} {:<10} {}",
                    marker, def.name, def.category, def.description
                ))?;
            }
            if plugins.is_empty() {
                output.print("  (none)")?;
            }
        }

        ListFormat::List => {
            for def in &plugins {
                println!("{}", def.name);
            }
        }

        ListFormat::Json => {
            // Serialise to stdout directly (bypasses OutputManager because
            // JSON output must be parseable even in non-TTY pipes).
            let json = serde_json::to_string_pretty(&plugins).unwrap_or_else(|_| "[]".into());
            println!("{json}");
        }
    }

    Ok(())
}

fn installed_marker(project: Option<&ScaforgeConfig>, def: &PluginDefinition) -> &'static str {
    match project {
        Some(p) if p.is_installed(&def.name) => "* ",
        Some(_) => "  ",
        None => "",
    }
}
