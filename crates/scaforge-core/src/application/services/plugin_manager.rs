//! Plugin Manager - main application orchestrator.
//!
//! The manager owns the mutable [`ScaforgeConfig`] and is its sole writer.
//! It coordinates the whole add/remove lifecycle:
//!
//! 1. Validate the request against the registry and current configuration
//! 2. Resolve the transitive dependency closure (cycle-safe)
//! 3. Per plugin: resolve options, render files, call the collaborators
//! 4. Mark the plugin installed and persist
//!
//! Execution is single-flight: operations run to completion before another
//! may begin, and collaborator calls are awaited sequentially because later
//! files may depend on earlier ones having established shared scaffolding.
//!
//! There is no rollback of completed plugins. A mid-closure failure leaves
//! the filesystem ahead of the persisted configuration for plugins
//! processed before the failure; the configuration is only marked for a
//! plugin after that plugin's side effects succeed, and it remains the
//! source of truth for subsequent operations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::ports::{ConfigStore, EnvVarStore, FileWriter, PackageInstaller},
    domain::{
        DomainError, FileSpec, OptionMap, PluginDefinition, PluginRegistry, PluginState,
        ScaforgeConfig,
    },
    error::{ScaforgeError, ScaforgeResult},
    template::{BindingContext, render},
};

/// Non-throwing validation result, so callers can present all problems at
/// once (interactive prompts, CI logs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Result of a successful `add`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// User-facing message; always contains "added successfully".
    pub message: String,
    /// Dependencies that were auto-installed, in install order.
    /// Does not include the requested plugin itself.
    pub installed_dependencies: Vec<String>,
    /// Rendered post-install notes, one per installed plugin that has one.
    pub post_install: Vec<String>,
}

/// Result of a successful `remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOutcome {
    pub message: String,
    /// Environment variables dropped from the env store.
    pub removed_env_vars: Vec<String>,
}

/// Main plugin orchestration service.
pub struct PluginManager {
    registry: Arc<PluginRegistry>,
    config: ScaforgeConfig,
    project_root: PathBuf,
    installer: Box<dyn PackageInstaller>,
    env_store: Box<dyn EnvVarStore>,
    file_writer: Box<dyn FileWriter>,
    config_store: Box<dyn ConfigStore>,
}

impl PluginManager {
    /// Create a manager for one CLI invocation.
    ///
    /// The registry must be fully populated before the first operation;
    /// the manager never registers plugins itself.
    pub fn new(
        registry: Arc<PluginRegistry>,
        config: ScaforgeConfig,
        project_root: impl Into<PathBuf>,
        installer: Box<dyn PackageInstaller>,
        env_store: Box<dyn EnvVarStore>,
        file_writer: Box<dyn FileWriter>,
        config_store: Box<dyn ConfigStore>,
    ) -> Self {
        Self {
            registry,
            config,
            project_root: project_root.into(),
            installer,
            env_store,
            file_writer,
            config_store,
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn is_installed(&self, name: &str) -> bool {
        self.config.is_installed(name)
    }

    /// Names of all enabled plugins, in name order.
    pub fn installed(&self) -> Vec<String> {
        self.config.installed()
    }

    /// Read-only snapshot of the current configuration.
    pub fn config(&self) -> &ScaforgeConfig {
        &self.config
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    // ── Validation (no side effects) ──────────────────────────────────────

    /// Collect every applicable objection to adding `name`.
    pub fn validate_add(&self, name: &str) -> ValidationReport {
        let mut errors = Vec::new();

        let Some(def) = self.registry.get(name) else {
            errors.push(
                DomainError::PluginNotFound {
                    name: name.to_string(),
                }
                .to_string(),
            );
            return ValidationReport::from_errors(errors);
        };

        if !def.supports_template(&self.config.template) {
            errors.push(
                DomainError::TemplateIncompatible {
                    plugin: name.to_string(),
                    template: self.config.template.clone(),
                }
                .to_string(),
            );
        }

        if self.config.is_installed(name) {
            errors.push(
                DomainError::AlreadyInstalled {
                    name: name.to_string(),
                }
                .to_string(),
            );
        }

        let conflicting = self.conflicting_plugins(def);
        if !conflicting.is_empty() {
            errors.push(
                DomainError::Conflict {
                    plugin: name.to_string(),
                    conflicting,
                }
                .to_string(),
            );
        }

        ValidationReport::from_errors(errors)
    }

    /// Collect every applicable objection to removing `name`.
    pub fn validate_remove(&self, name: &str) -> ValidationReport {
        let mut errors = Vec::new();

        if !self.config.is_installed(name) {
            errors.push(
                DomainError::NotInstalled {
                    name: name.to_string(),
                }
                .to_string(),
            );
            return ValidationReport::from_errors(errors);
        }

        let dependents = self.dependents_of(name);
        if !dependents.is_empty() {
            errors.push(
                DomainError::DependentsExist {
                    name: name.to_string(),
                    dependents,
                }
                .to_string(),
            );
        }

        ValidationReport::from_errors(errors)
    }

    // ── Mutations ─────────────────────────────────────────────────────────

    /// Add a plugin (and its unresolved dependencies) to the project.
    ///
    /// Raises on the first blocking condition, in this order: unknown
    /// plugin, template mismatch, already installed, conflicts. Use
    /// [`Self::validate_add`] first to collect all problems non-fatally.
    #[instrument(skip_all, fields(plugin = %name, project = %self.config.name))]
    pub fn add(&mut self, name: &str, options: Option<OptionMap>) -> ScaforgeResult<AddOutcome> {
        let def = self.registry.get(name).ok_or(DomainError::PluginNotFound {
            name: name.to_string(),
        })?;

        if !def.supports_template(&self.config.template) {
            return Err(DomainError::TemplateIncompatible {
                plugin: name.to_string(),
                template: self.config.template.clone(),
            }
            .into());
        }
        if self.config.is_installed(name) {
            return Err(DomainError::AlreadyInstalled {
                name: name.to_string(),
            }
            .into());
        }
        let conflicting = self.conflicting_plugins(def);
        if !conflicting.is_empty() {
            return Err(DomainError::Conflict {
                plugin: name.to_string(),
                conflicting,
            }
            .into());
        }

        // Dependency-first closure of everything not yet installed.
        let closure = self.resolve_closure(name)?;
        debug!(order = ?closure, "dependency closure resolved");

        let mut installed_dependencies = Vec::new();
        let mut post_install = Vec::new();

        for plugin_name in &closure {
            let def = self
                .registry
                .get(plugin_name)
                .ok_or(DomainError::PluginNotFound {
                    name: plugin_name.clone(),
                })?
                .clone();

            // Dependencies get schema defaults only; user options apply to
            // the requested plugin alone.
            let supplied = if plugin_name == name {
                options.clone().unwrap_or_default()
            } else {
                OptionMap::new()
            };
            let resolved = self.resolve_options(&def, supplied)?;

            self.materialize(&def, &resolved)?;

            if !def.packages.is_empty() {
                self.installer.install(&self.project_root, &def.packages)?;
            }
            if !def.env_vars.is_empty() {
                self.env_store
                    .upsert_for_plugin(&self.project_root, &def.name, &def.env_vars)?;
            }

            if let Some(note) = &def.post_install {
                let ctx = self.binding_context(&resolved);
                post_install.push(render(note, &ctx).map_err(|e| DomainError::TemplateSyntax {
                    plugin: def.name.clone(),
                    path: "post_install".into(),
                    reason: e.message,
                })?);
            }

            // Only now is the plugin part of the project; persist
            // immediately so a later failure cannot lose this step.
            self.config
                .plugins
                .insert(plugin_name.clone(), PluginState::enabled(resolved));
            self.config_store.save(&self.project_root, &self.config)?;

            if plugin_name != name {
                installed_dependencies.push(plugin_name.clone());
            }
            info!(plugin = %plugin_name, "plugin installed");
        }

        Ok(AddOutcome {
            message: format!("Plugin '{name}' added successfully"),
            installed_dependencies,
            post_install,
        })
    }

    /// Remove a single plugin from the project.
    ///
    /// Never cascades: a dependency stays installed after its dependent is
    /// removed.
    #[instrument(skip_all, fields(plugin = %name, project = %self.config.name))]
    pub fn remove(&mut self, name: &str) -> ScaforgeResult<RemoveOutcome> {
        if !self.config.is_installed(name) {
            return Err(DomainError::NotInstalled {
                name: name.to_string(),
            }
            .into());
        }

        let dependents = self.dependents_of(name);
        if !dependents.is_empty() {
            return Err(DomainError::DependentsExist {
                name: name.to_string(),
                dependents,
            }
            .into());
        }

        // Registry membership is enforced lazily: the entry may predate
        // this process's registrations.
        let def = self
            .registry
            .get(name)
            .ok_or(DomainError::PluginNotFound {
                name: name.to_string(),
            })?
            .clone();

        if !def.packages.is_empty() {
            self.installer
                .uninstall(&self.project_root, &def.packages.all_names())?;
        }
        let removed_env_vars = self
            .env_store
            .remove_for_plugin(&self.project_root, name)?;

        self.config.plugins.remove(name);
        self.config_store.save(&self.project_root, &self.config)?;
        info!(plugin = %name, "plugin removed");

        Ok(RemoveOutcome {
            message: format!("Plugin '{name}' removed successfully"),
            removed_env_vars,
        })
    }

    // ── Internal helpers ──────────────────────────────────────────────────

    /// Installed plugins that conflict with `def`, in either direction.
    fn conflicting_plugins(&self, def: &PluginDefinition) -> Vec<String> {
        let installed = self.config.installed();
        let mut conflicting: Vec<String> = Vec::new();

        for candidate in &installed {
            let declared_by_new = def.conflicts.contains(candidate);
            let declares_new = self
                .registry
                .get(candidate)
                .is_some_and(|d| d.conflicts.contains(&def.name));
            if declared_by_new || declares_new {
                conflicting.push(candidate.clone());
            }
        }
        conflicting
    }

    /// Installed plugins that list `name` among their dependencies.
    fn dependents_of(&self, name: &str) -> Vec<String> {
        self.config
            .installed()
            .into_iter()
            .filter(|installed| {
                self.registry
                    .get(installed)
                    .is_some_and(|d| d.dependencies.iter().any(|dep| dep == name))
            })
            .collect()
    }

    /// Dependency-first install order for `root` and its not-yet-installed
    /// transitive dependencies.  Fails on cycles instead of looping, and on
    /// any member that does not support the project's base template.
    fn resolve_closure(&self, root: &str) -> ScaforgeResult<Vec<String>> {
        let mut order = Vec::new();
        let mut stack = Vec::new();
        self.visit(root, &mut order, &mut stack)?;
        Ok(order)
    }

    fn visit(
        &self,
        name: &str,
        order: &mut Vec<String>,
        stack: &mut Vec<String>,
    ) -> ScaforgeResult<()> {
        if stack.iter().any(|n| n == name) {
            let mut chain = stack.clone();
            chain.push(name.to_string());
            return Err(DomainError::CyclicDependency { chain }.into());
        }
        if self.config.is_installed(name) || order.iter().any(|n| n == name) {
            return Ok(());
        }

        let def = self.registry.get(name).ok_or(DomainError::PluginNotFound {
            name: name.to_string(),
        })?;

        // A closure member that cannot run on the project's base template
        // fails the whole add; skipping it would leave a broken install.
        if !def.supports_template(&self.config.template) {
            return Err(DomainError::TemplateIncompatible {
                plugin: name.to_string(),
                template: self.config.template.clone(),
            }
            .into());
        }

        stack.push(name.to_string());
        for dep in &def.dependencies {
            self.visit(dep, order, stack)?;
        }
        stack.pop();

        order.push(name.to_string());
        Ok(())
    }

    /// Validate user options against the plugin's schema and fill defaults.
    fn resolve_options(
        &self,
        def: &PluginDefinition,
        supplied: OptionMap,
    ) -> ScaforgeResult<OptionMap> {
        match &def.config_schema {
            Some(schema) => {
                schema
                    .resolve(&supplied)
                    .map_err(|violations| {
                        DomainError::SchemaValidation {
                            plugin: def.name.clone(),
                            violations: violations.iter().map(ToString::to_string).collect(),
                        }
                        .into()
                    })
            }
            // No schema: pass user options through untouched.
            None => Ok(supplied),
        }
    }

    fn binding_context(&self, options: &OptionMap) -> BindingContext {
        BindingContext::new(
            self.config.template.clone(),
            options.clone(),
            self.config.name.clone(),
            self.config.installed(),
        )
    }

    /// Render and emit everything `def` contributes: its own files, its
    /// integrations with already-installed plugins, and files installed
    /// plugins contribute toward `def`.
    fn materialize(&self, def: &PluginDefinition, options: &OptionMap) -> ScaforgeResult<()> {
        let ctx = self.binding_context(options);

        for spec in &def.files {
            self.emit_file(&def.name, spec, &ctx)?;
        }

        for integration in &def.integrations {
            if self.config.is_installed(&integration.plugin) {
                debug!(
                    plugin = %def.name,
                    with = %integration.plugin,
                    "emitting integration files"
                );
                for spec in &integration.files {
                    self.emit_file(&def.name, spec, &ctx)?;
                }
            }
        }

        // Symmetric direction: installed plugins may carry integrations
        // targeting the plugin being added.  Those files render with the
        // contributing plugin's stored options.
        for other_name in self.config.installed() {
            let Some(other) = self.registry.get(&other_name) else {
                warn!(plugin = %other_name, "installed plugin missing from registry");
                continue;
            };
            for integration in &other.integrations {
                if integration.plugin != def.name {
                    continue;
                }
                debug!(plugin = %other_name, with = %def.name, "emitting integration files");
                let other_options = self
                    .config
                    .options_of(&other_name)
                    .cloned()
                    .unwrap_or_default();
                let other_ctx = self.binding_context(&other_options);
                for spec in &integration.files {
                    self.emit_file(&other_name, spec, &other_ctx)?;
                }
            }
        }

        Ok(())
    }

    /// Render one file spec and hand it to the file writer.
    ///
    /// Specs restricted to a different base template are skipped silently;
    /// template syntax failures are fatal and name the plugin and path.
    fn emit_file(&self, plugin: &str, spec: &FileSpec, ctx: &BindingContext) -> ScaforgeResult<()> {
        if let Some(condition) = &spec.condition {
            if condition.template != self.config.template {
                debug!(
                    plugin = %plugin,
                    path = %spec.path,
                    wanted = %condition.template,
                    "file restricted to another template, skipping"
                );
                return Ok(());
            }
        }

        let syntax = |path: &str, e: crate::template::TemplateError| {
            ScaforgeError::from(DomainError::TemplateSyntax {
                plugin: plugin.to_string(),
                path: path.to_string(),
                reason: e.message,
            })
        };

        let rendered_path = render(&spec.path, ctx).map_err(|e| syntax(&spec.path, e))?;
        let content = render(&spec.template, ctx).map_err(|e| syntax(&rendered_path, e))?;

        let destination = self.project_root.join(&rendered_path);
        debug!(path = %destination.display(), overwrite = spec.overwrite, "writing file");
        self.file_writer
            .write(&destination, &content, spec.overwrite)
    }
}
