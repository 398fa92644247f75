//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables (`SCAFORGE_PACKAGE_MANAGER`)
//! 3. Config file (`--config`, or the default platform location)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use scaforge_adapters::PackageManager;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Package manager used for install/uninstall shell-outs.
    pub package_manager: PackageManagerConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageManagerConfig {
    /// `npm`, `pnpm`, `yarn`, or `bun`.
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// `config_file` is the path the user passed via `--config` (or `None`
    /// to use the default location).  A missing file is not an error; a
    /// present-but-malformed file is.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let path = config_file.cloned().unwrap_or_else(Self::config_path);
        let mut config = if path.exists() {
            Self::read_file(&path)?
        } else {
            Self::default()
        };

        if let Ok(manager) = std::env::var("SCAFORGE_PACKAGE_MANAGER") {
            config.package_manager.name = Some(manager);
        }
        Ok(config)
    }

    fn read_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("could not read {}: {}", path.display(), e))?;
        serde_json::from_str(&text)
            .map_err(|e| anyhow::anyhow!("invalid JSON in {}: {}", path.display(), e))
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.scaforge.json` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "scaforge", "scaforge")
            .map(|d| d.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from(".scaforge.json"))
    }

    /// Resolve the configured package manager, defaulting to npm.
    pub fn package_manager(&self) -> anyhow::Result<PackageManager> {
        match &self.package_manager.name {
            Some(name) => name
                .parse()
                .map_err(|e: String| anyhow::anyhow!("{e} (in configuration)")),
            None => Ok(PackageManager::default()),
        }
    }
}
