//! Project-configuration persistence.
//!
//! The durable form is `scaforge.config.json` at the project root, written
//! pretty-printed so it diffs well under version control.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use tracing::debug;

use scaforge_core::{
    application::{ApplicationError, ports::ConfigStore},
    domain::ScaforgeConfig,
    error::ScaforgeResult,
};

const CONFIG_FILE: &str = "scaforge.config.json";

/// Production store reading and writing `scaforge.config.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonConfigStore;

impl JsonConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Path of the config file under a project root.
    pub fn config_path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_FILE)
    }

    /// Whether a scaforge project exists at the given root.
    pub fn project_exists(project_root: &Path) -> bool {
        Self::config_path(project_root).exists()
    }
}

impl ConfigStore for JsonConfigStore {
    fn load(&self, project_root: &Path) -> ScaforgeResult<ScaforgeConfig> {
        let path = Self::config_path(project_root);
        if !path.exists() {
            return Err(ApplicationError::ProjectNotFound {
                path: project_root.to_path_buf(),
            }
            .into());
        }

        let text = std::fs::read_to_string(&path).map_err(|e| {
            ApplicationError::ConfigStoreFailed {
                reason: format!("could not read {}: {}", path.display(), e),
            }
        })?;
        let config = serde_json::from_str(&text).map_err(|e| {
            ApplicationError::ConfigStoreFailed {
                reason: format!("invalid JSON in {}: {}", path.display(), e),
            }
        })?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    fn save(&self, project_root: &Path, config: &ScaforgeConfig) -> ScaforgeResult<()> {
        let path = Self::config_path(project_root);
        let mut text = serde_json::to_string_pretty(config).map_err(|e| {
            ApplicationError::ConfigStoreFailed {
                reason: format!("could not serialise configuration: {e}"),
            }
        })?;
        text.push('\n');

        std::fs::write(&path, text).map_err(|e| {
            ApplicationError::ConfigStoreFailed {
                reason: format!("could not write {}: {}", path.display(), e),
            }
        })?;
        debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    config: Arc<RwLock<Option<ScaforgeConfig>>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a configuration, as if `scaforge init` had run.
    pub fn seed(&self, config: ScaforgeConfig) {
        *self.config.write().unwrap() = Some(config);
    }

    /// Last saved configuration (testing helper).
    pub fn current(&self) -> Option<ScaforgeConfig> {
        self.config.read().unwrap().clone()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self, project_root: &Path) -> ScaforgeResult<ScaforgeConfig> {
        self.config
            .read()
            .map_err(|_| ApplicationError::LockPoisoned)?
            .clone()
            .ok_or_else(|| {
                ApplicationError::ProjectNotFound {
                    path: project_root.to_path_buf(),
                }
                .into()
            })
    }

    fn save(&self, _project_root: &Path, config: &ScaforgeConfig) -> ScaforgeResult<()> {
        *self
            .config
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)? = Some(config.clone());
        Ok(())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use scaforge_core::domain::{OptionMap, PluginState};
    use serde_json::json;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConfigStore::new();

        let mut config = ScaforgeConfig::new("my-app", "nextjs");
        let mut opts = OptionMap::new();
        opts.insert("provider".into(), json!("sqlite"));
        config.plugins.insert("prisma".into(), PluginState::enabled(opts));

        store.save(dir.path(), &config).unwrap();
        let loaded = store.load(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_without_project_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonConfigStore::new().load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("No scaforge project found"));
    }

    #[test]
    fn load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{not json").unwrap();
        let err = JsonConfigStore::new().load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn saved_file_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScaforgeConfig::new("my-app", "nextjs");
        JsonConfigStore::new().save(dir.path(), &config).unwrap();

        let text = std::fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        assert!(text.contains("\n  \"name\": \"my-app\""));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn memory_store_load_fails_until_seeded() {
        let store = MemoryConfigStore::new();
        assert!(store.load(Path::new("/p")).is_err());

        store.seed(ScaforgeConfig::new("app", "nextjs"));
        assert_eq!(store.load(Path::new("/p")).unwrap().name, "app");
    }
}
