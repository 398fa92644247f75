//! `scaforge info` — show the full definition of one plugin.

use scaforge_core::domain::{DomainError, PluginDefinition};

use crate::{
    cli::{GlobalArgs, InfoArgs},
    commands::builtin_registry,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: InfoArgs,
    _global: GlobalArgs,
    _config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let registry = builtin_registry()?;

    let Some(def) = registry.get(&args.plugin) else {
        return Err(CliError::Core(
            DomainError::PluginNotFound { name: args.plugin }.into(),
        ));
    };

    print_definition(def, &output)?;
    Ok(())
}

fn print_definition(def: &PluginDefinition, output: &OutputManager) -> CliResult<()> {
    output.header(&format!("{} ({})", def.display_name, def.name))?;
    output.print(&format!("  Category:   {}", def.category))?;
    output.print(&format!("  Version:    {}", def.version))?;
    if !def.description.is_empty() {
        output.print(&format!("  About:      {}", def.description))?;
    }
    output.print(&format!(
        "  Templates:  {}",
        def.supported_templates
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    ))?;

    if !def.dependencies.is_empty() {
        output.print(&format!("  Depends on: {}", def.dependencies.join(", ")))?;
    }
    if !def.conflicts.is_empty() {
        output.print(&format!("  Conflicts:  {}", def.conflicts.join(", ")))?;
    }

    if !def.packages.dependencies.is_empty() || !def.packages.dev_dependencies.is_empty() {
        output.print("")?;
        output.print("  Packages:")?;
        for pkg in &def.packages.dependencies {
            output.print(&format!("    {}@{}", pkg.name, pkg.version))?;
        }
        for pkg in &def.packages.dev_dependencies {
            output.print(&format!("    {}@{} (dev)", pkg.name, pkg.version))?;
        }
    }

    if !def.env_vars.is_empty() {
        output.print("")?;
        output.print("  Environment variables:")?;
        for var in &def.env_vars {
            let mut notes = Vec::new();
            if var.required {
                notes.push("required");
            }
            if var.secret {
                notes.push("secret");
            }
            let suffix = if notes.is_empty() {
                String::new()
            } else {
                format!(" [{}]", notes.join(", "))
            };
            output.print(&format!("    {}{} - {}", var.name, suffix, var.description))?;
        }
    }

    if let Some(schema) = &def.config_schema {
        output.print("")?;
        output.print("  Options:")?;
        for field in schema.fields() {
            let mut line = format!("    {} ({})", field.name, field.kind);
            if let Some(default) = &field.default {
                line.push_str(&format!(" = {default}"));
            }
            if !field.description.is_empty() {
                line.push_str(&format!(" - {}", field.description));
            }
            output.print(&line)?;
            if !field.allowed.is_empty() {
                let choices: Vec<String> =
                    field.allowed.iter().map(|v| v.to_string()).collect();
                output.print(&format!("      one of: {}", choices.join(", ")))?;
            }
        }
    }

    if !def.files.is_empty() {
        output.print("")?;
        output.print("  Generated files:")?;
        for file in &def.files {
            let qualifier = file
                .condition
                .as_ref()
                .map(|c| format!(" ({} only)", c.template))
                .unwrap_or_default();
            output.print(&format!("    {}{}", file.path, qualifier))?;
        }
    }

    if !def.integrations.is_empty() {
        output.print("")?;
        output.print("  Integrations:")?;
        for integration in &def.integrations {
            for file in &integration.files {
                output.print(&format!("    with {}: {}", integration.plugin, file.path))?;
            }
        }
    }

    Ok(())
}
