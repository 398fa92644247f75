//! Package-manager adapters.
//!
//! `ShellInstaller` shells out to an npm-family package manager;
//! `MemoryInstaller` records calls for tests; `NoopInstaller` backs the
//! `--skip-install` flag.

use std::{
    fmt,
    path::Path,
    process::Command,
    str::FromStr,
    sync::{Arc, RwLock},
};

use tracing::{debug, info};

use scaforge_core::{
    application::{ApplicationError, ports::PackageInstaller},
    domain::PackageSet,
    error::ScaforgeResult,
};

/// Supported JavaScript package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    /// Executable name.
    pub fn command(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }

    /// Subcommand that adds packages.
    fn install_verb(self) -> &'static str {
        match self {
            Self::Npm => "install",
            Self::Pnpm | Self::Yarn | Self::Bun => "add",
        }
    }

    /// Subcommand that removes packages.
    fn uninstall_verb(self) -> &'static str {
        match self {
            Self::Npm => "uninstall",
            Self::Pnpm | Self::Yarn | Self::Bun => "remove",
        }
    }

    /// Flag that marks packages as development-only.
    fn dev_flag(self) -> &'static str {
        match self {
            Self::Npm | Self::Pnpm | Self::Bun => "--save-dev",
            Self::Yarn => "--dev",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "pnpm" => Ok(Self::Pnpm),
            "yarn" => Ok(Self::Yarn),
            "bun" => Ok(Self::Bun),
            other => Err(format!("unknown package manager '{other}'")),
        }
    }
}

/// Production installer shelling out to the configured package manager.
#[derive(Debug, Clone, Copy)]
pub struct ShellInstaller {
    manager: PackageManager,
}

impl ShellInstaller {
    pub fn new(manager: PackageManager) -> Self {
        Self { manager }
    }

    fn run(&self, project_root: &Path, args: &[&str]) -> ScaforgeResult<()> {
        debug!(manager = %self.manager, ?args, "running package manager");
        let output = Command::new(self.manager.command())
            .args(args)
            .current_dir(project_root)
            .output()
            .map_err(|e| ApplicationError::PackageManagerFailed {
                operation: args.first().unwrap_or(&"run").to_string(),
                reason: format!("could not start {}: {}", self.manager, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ApplicationError::PackageManagerFailed {
                operation: args.first().unwrap_or(&"run").to_string(),
                reason: stderr.lines().last().unwrap_or("non-zero exit").to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for ShellInstaller {
    fn default() -> Self {
        Self::new(PackageManager::default())
    }
}

impl PackageInstaller for ShellInstaller {
    fn install(&self, project_root: &Path, packages: &PackageSet) -> ScaforgeResult<()> {
        if !packages.dependencies.is_empty() {
            let specs: Vec<String> = packages
                .dependencies
                .iter()
                .map(|p| format!("{}@{}", p.name, p.version))
                .collect();
            let mut args = vec![self.manager.install_verb()];
            args.extend(specs.iter().map(String::as_str));
            self.run(project_root, &args)?;
        }

        if !packages.dev_dependencies.is_empty() {
            let specs: Vec<String> = packages
                .dev_dependencies
                .iter()
                .map(|p| format!("{}@{}", p.name, p.version))
                .collect();
            let mut args = vec![self.manager.install_verb(), self.manager.dev_flag()];
            args.extend(specs.iter().map(String::as_str));
            self.run(project_root, &args)?;
        }

        info!(manager = %self.manager, "packages installed");
        Ok(())
    }

    fn uninstall(&self, project_root: &Path, package_names: &[String]) -> ScaforgeResult<()> {
        if package_names.is_empty() {
            return Ok(());
        }
        let mut args = vec![self.manager.uninstall_verb()];
        args.extend(package_names.iter().map(String::as_str));
        self.run(project_root, &args)
    }
}

/// Installer that does nothing, for `--skip-install` runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInstaller;

impl PackageInstaller for NoopInstaller {
    fn install(&self, _project_root: &Path, packages: &PackageSet) -> ScaforgeResult<()> {
        info!(count = packages.all_names().len(), "skipping package install");
        Ok(())
    }

    fn uninstall(&self, _project_root: &Path, package_names: &[String]) -> ScaforgeResult<()> {
        info!(count = package_names.len(), "skipping package uninstall");
        Ok(())
    }
}

/// Recording installer for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryInstaller {
    calls: Arc<RwLock<Vec<InstallerCall>>>,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallerCall {
    Install(Vec<String>),
    Uninstall(Vec<String>),
}

impl MemoryInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<InstallerCall> {
        self.calls.read().unwrap().clone()
    }
}

impl PackageInstaller for MemoryInstaller {
    fn install(&self, _project_root: &Path, packages: &PackageSet) -> ScaforgeResult<()> {
        self.calls
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?
            .push(InstallerCall::Install(packages.all_names()));
        Ok(())
    }

    fn uninstall(&self, _project_root: &Path, package_names: &[String]) -> ScaforgeResult<()> {
        self.calls
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?
            .push(InstallerCall::Uninstall(package_names.to_vec()));
        Ok(())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
