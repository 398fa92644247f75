//! Persisted project configuration.
//!
//! [`ScaforgeConfig`] is the single piece of durable state: the project
//! name, the base template it was generated from, and the set of installed
//! plugins with their resolved options.  It is created once at project-init
//! time and mutated exclusively through the `PluginManager`; a `ConfigStore`
//! adapter serialises it after each successful mutation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Option object attached to an installed plugin.
///
/// `serde_json::Map` keeps insertion order, which makes persisted configs
/// diff-friendly.
pub type OptionMap = serde_json::Map<String, Value>;

/// Per-plugin entry in the project configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginState {
    pub enabled: bool,
    #[serde(default)]
    pub options: OptionMap,
}

impl PluginState {
    pub fn enabled(options: OptionMap) -> Self {
        Self {
            enabled: true,
            options,
        }
    }
}

/// The persisted project configuration.
///
/// Plugin keys are not eagerly checked against the registry: a plugin may be
/// registered after the config is loaded.  Every operation that reads an
/// entry resolves it lazily and fails then if the name is unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaforgeConfig {
    pub name: String,
    /// Base framework/template id the project was generated from.
    pub template: String,
    /// Installed plugins, keyed by plugin name.
    #[serde(default)]
    pub plugins: BTreeMap<String, PluginState>,
}

impl ScaforgeConfig {
    /// Fresh configuration for a newly initialised project.
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            plugins: BTreeMap::new(),
        }
    }

    /// Whether `plugin` is present and enabled.
    pub fn is_installed(&self, plugin: &str) -> bool {
        self.plugins.get(plugin).is_some_and(|s| s.enabled)
    }

    /// Names of all enabled plugins, in name order.
    pub fn installed(&self) -> Vec<String> {
        self.plugins
            .iter()
            .filter(|(_, state)| state.enabled)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Resolved options of an installed plugin, if any.
    pub fn options_of(&self, plugin: &str) -> Option<&OptionMap> {
        self.plugins
            .get(plugin)
            .filter(|s| s.enabled)
            .map(|s| &s.options)
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
