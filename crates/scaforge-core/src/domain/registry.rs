//! In-memory plugin catalog.
//!
//! The registry is populated once at process start, before any manager
//! operation runs, so it needs no interior mutability or locking.  It is
//! passed explicitly into the `PluginManager` (no ambient global state),
//! which keeps the core testable; `clear` exists for test isolation.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::error::DomainError;
use super::plugin::{PluginCategory, PluginDefinition};

/// Catalog of plugin definitions, keyed by unique name.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, PluginDefinition>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition.  Fails if the name is already taken.
    pub fn register(&mut self, def: PluginDefinition) -> Result<(), DomainError> {
        if self.plugins.contains_key(&def.name) {
            return Err(DomainError::DuplicatePlugin {
                name: def.name.clone(),
            });
        }
        debug!(plugin = %def.name, category = %def.category, "plugin registered");
        self.plugins.insert(def.name.clone(), def);
        Ok(())
    }

    /// Look up a definition by name.  Never fails; absence is `None`.
    pub fn get(&self, name: &str) -> Option<&PluginDefinition> {
        self.plugins.get(name)
    }

    /// Snapshot of every registered definition, in name order.
    pub fn get_all(&self) -> Vec<&PluginDefinition> {
        self.plugins.values().collect()
    }

    /// All definitions in a category, in name order.
    pub fn get_by_category(&self, category: PluginCategory) -> Vec<&PluginDefinition> {
        self.plugins
            .values()
            .filter(|def| def.category == category)
            .collect()
    }

    /// Distinct categories currently present, for listings and errors.
    pub fn get_categories(&self) -> BTreeSet<PluginCategory> {
        self.plugins.values().map(|def| def.category).collect()
    }

    /// Empty the registry.  Test isolation only.
    pub fn clear(&mut self) {
        self.plugins.clear();
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin(name: &str, category: PluginCategory) -> PluginDefinition {
        PluginDefinition::builder(name)
            .category(category)
            .supports("nextjs")
            .build()
            .unwrap()
    }

    #[test]
    fn register_then_get() {
        let mut registry = PluginRegistry::new();
        registry
            .register(plugin("prisma", PluginCategory::Database))
            .unwrap();

        assert!(registry.get("prisma").is_some());
        assert!(registry.get("drizzle").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = PluginRegistry::new();
        registry
            .register(plugin("prisma", PluginCategory::Database))
            .unwrap();

        let err = registry
            .register(plugin("prisma", PluginCategory::Database))
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicatePlugin { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_all_is_name_ordered() {
        let mut registry = PluginRegistry::new();
        registry
            .register(plugin("trpc", PluginCategory::Api))
            .unwrap();
        registry
            .register(plugin("prisma", PluginCategory::Database))
            .unwrap();

        let names: Vec<_> = registry.get_all().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["prisma", "trpc"]);
    }

    #[test]
    fn category_filter_and_enumeration() {
        let mut registry = PluginRegistry::new();
        registry
            .register(plugin("trpc", PluginCategory::Api))
            .unwrap();
        registry
            .register(plugin("apollo", PluginCategory::Api))
            .unwrap();
        registry
            .register(plugin("prisma", PluginCategory::Database))
            .unwrap();

        let apis = registry.get_by_category(PluginCategory::Api);
        assert_eq!(apis.len(), 2);
        assert_eq!(apis[0].name, "apollo");

        let cats = registry.get_categories();
        assert_eq!(cats.len(), 2);
        assert!(cats.contains(&PluginCategory::Api));
        assert!(cats.contains(&PluginCategory::Database));
    }

    #[test]
    fn clear_empties_the_registry() {
        let mut registry = PluginRegistry::new();
        registry
            .register(plugin("prisma", PluginCategory::Database))
            .unwrap();
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.get("prisma").is_none());
    }
}
