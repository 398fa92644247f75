//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `scaforge-adapters` crate provides implementations.
//!
//! The core never performs side effects itself: the manager decides *what*
//! must happen and these collaborators execute it, which keeps every
//! manager code path unit-testable with in-memory doubles.

use std::path::Path;

use crate::domain::{EnvVar, PackageSet, ScaforgeConfig};
use crate::error::ScaforgeResult;

/// Port for package-manager operations.
///
/// Implemented by:
/// - `scaforge_adapters::installer::ShellInstaller` (production, npm-style)
/// - `scaforge_adapters::installer::MemoryInstaller` (testing)
///
/// Any failure is fatal for the current add/remove; the manager does not
/// retry.
pub trait PackageInstaller: Send + Sync {
    /// Install a plugin's runtime and development packages.
    fn install(&self, project_root: &Path, packages: &PackageSet) -> ScaforgeResult<()>;

    /// Uninstall packages by name.
    fn uninstall(&self, project_root: &Path, package_names: &[String]) -> ScaforgeResult<()>;
}

/// Port for environment-variable bookkeeping (`.env.example`).
pub trait EnvVarStore: Send + Sync {
    /// Create or update the variables a plugin declares.
    fn upsert_for_plugin(
        &self,
        project_root: &Path,
        plugin: &str,
        vars: &[EnvVar],
    ) -> ScaforgeResult<()>;

    /// Remove a plugin's variables, returning the removed names.
    fn remove_for_plugin(&self, project_root: &Path, plugin: &str) -> ScaforgeResult<Vec<String>>;
}

/// Port for file emission.
///
/// Implementations must refuse to clobber an existing file unless
/// `overwrite` is true.
pub trait FileWriter: Send + Sync {
    fn write(&self, path: &Path, content: &str, overwrite: bool) -> ScaforgeResult<()>;
}

/// Port for project-configuration persistence.
pub trait ConfigStore: Send + Sync {
    fn load(&self, project_root: &Path) -> ScaforgeResult<ScaforgeConfig>;

    fn save(&self, project_root: &Path, config: &ScaforgeConfig) -> ScaforgeResult<()>;
}
