//! Command handlers.
//!
//! Each submodule implements one subcommand: translate CLI arguments into
//! core calls and display results.  No business logic lives here.

pub mod add;
pub mod completions;
pub mod info;
pub mod init;
pub mod list;
pub mod remove;

use std::sync::Arc;

use scaforge_adapters::{
    EnvFileStore, JsonConfigStore, LocalFileWriter, NoopInstaller, ShellInstaller,
    register_builtins,
};
use scaforge_core::application::ports::{ConfigStore as _, PackageInstaller};
use scaforge_core::domain::PluginRegistry;
use scaforge_core::prelude::PluginManager;

use crate::{
    cli::GlobalArgs,
    config::AppConfig,
    error::{CliError, CliResult},
};

/// Registry with the built-in catalog loaded.
pub(crate) fn builtin_registry() -> CliResult<PluginRegistry> {
    let mut registry = PluginRegistry::new();
    register_builtins(&mut registry).map_err(|e| CliError::Core(e.into()))?;
    Ok(registry)
}

/// Wire up a [`PluginManager`] over the project at the resolved root.
///
/// Fails with a not-found error (exit 3) when no `scaforge.config.json`
/// exists there.
pub(crate) fn build_manager(
    global: &GlobalArgs,
    config: &AppConfig,
    skip_install: bool,
) -> CliResult<PluginManager> {
    let project_root = global.project_root();
    let registry = builtin_registry()?;

    let config_store = JsonConfigStore::new();
    let project = config_store.load(&project_root).map_err(CliError::Core)?;

    let installer: Box<dyn PackageInstaller> = if skip_install {
        Box::new(NoopInstaller)
    } else {
        let manager = config
            .package_manager()
            .map_err(|e| CliError::ConfigError {
                message: e.to_string(),
                source: None,
            })?;
        Box::new(ShellInstaller::new(manager))
    };

    Ok(PluginManager::new(
        Arc::new(registry),
        project,
        project_root,
        installer,
        Box::new(EnvFileStore::new()),
        Box::new(LocalFileWriter::new()),
        Box::new(config_store),
    ))
}
