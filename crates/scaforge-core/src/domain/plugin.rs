//! Plugin definition aggregate.
//!
//! A [`PluginDefinition`] is the immutable, declarative description of one
//! installable feature bundle: the packages it pulls in, the environment
//! variables it needs, the files it renders into the project, and how it
//! relates to other plugins (dependencies, conflicts, integrations).
//!
//! Definitions are registered once at startup into the
//! [`PluginRegistry`](super::registry::PluginRegistry) and never mutated
//! afterwards.  All project-state mutation happens through the
//! `PluginManager` in the application layer.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::schema::ConfigSchema;

// ── Category ──────────────────────────────────────────────────────────────────

/// Functional category a plugin belongs to.
///
/// Used for listings (`scaforge list --category database`) and error
/// messages.  The set is closed on purpose: a new kind of plugin warrants a
/// new variant, not a free-form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginCategory {
    Api,
    Database,
    Auth,
    Payments,
    Cms,
    Email,
}

impl fmt::Display for PluginCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api => write!(f, "api"),
            Self::Database => write!(f, "database"),
            Self::Auth => write!(f, "auth"),
            Self::Payments => write!(f, "payments"),
            Self::Cms => write!(f, "cms"),
            Self::Email => write!(f, "email"),
        }
    }
}

impl FromStr for PluginCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "api" => Ok(Self::Api),
            "database" | "db" => Ok(Self::Database),
            "auth" => Ok(Self::Auth),
            "payments" => Ok(Self::Payments),
            "cms" => Ok(Self::Cms),
            "email" => Ok(Self::Email),
            other => Err(DomainError::InvalidDefinition {
                name: other.to_string(),
                reason: format!("'{other}' is not a plugin category"),
            }),
        }
    }
}

// ── Packages ──────────────────────────────────────────────────────────────────

/// A single external package requirement (`name` at `version` range).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    pub name: String,
    pub version: String,
}

impl PackageSpec {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Runtime and development package requirements of a plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSet {
    pub dependencies: Vec<PackageSpec>,
    pub dev_dependencies: Vec<PackageSpec>,
}

impl PackageSet {
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.dev_dependencies.is_empty()
    }

    /// Names of every package in the set, runtime first.
    ///
    /// Used on removal, where the package manager only needs names.
    pub fn all_names(&self) -> Vec<String> {
        self.dependencies
            .iter()
            .chain(self.dev_dependencies.iter())
            .map(|p| p.name.clone())
            .collect()
    }
}

// ── Environment variables ─────────────────────────────────────────────────────

/// Declaration of one environment variable a plugin needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub description: String,
    /// The project will not run without this variable set.
    pub required: bool,
    /// Secrets never get a default written to `.env.example`.
    pub secret: bool,
    pub default: Option<String>,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: false,
            secret: false,
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }
}

// ── Files ─────────────────────────────────────────────────────────────────────

/// Restricts a [`FileSpec`] to a specific base template.
///
/// A spec with `condition: Some(FileCondition { template: "nextjs" })` is
/// only emitted into projects generated from the `nextjs` skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCondition {
    pub template: String,
}

/// One file a plugin contributes to the project.
///
/// Both `path` and `template` are template strings evaluated against the
/// binding context, so destinations may reference options
/// (`src/{{options.dir}}/client.ts`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSpec {
    pub path: String,
    pub template: String,
    pub condition: Option<FileCondition>,
    /// Whether emission may replace an existing file at the destination.
    pub overwrite: bool,
}

impl FileSpec {
    pub fn new(path: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            template: template.into(),
            condition: None,
            overwrite: false,
        }
    }

    /// Emit only into projects using the given base template.
    pub fn only_for(mut self, template: impl Into<String>) -> Self {
        self.condition = Some(FileCondition {
            template: template.into(),
        });
        self
    }

    pub fn overwriting(mut self) -> Self {
        self.overwrite = true;
        self
    }
}

/// Extra files a plugin contributes when a named other plugin is also
/// installed.  Activated from either direction: whichever endpoint is added
/// second triggers the emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    pub plugin: String,
    pub files: Vec<FileSpec>,
}

impl Integration {
    pub fn new(plugin: impl Into<String>, files: Vec<FileSpec>) -> Self {
        Self {
            plugin: plugin.into(),
            files,
        }
    }
}

// ── Plugin definition ─────────────────────────────────────────────────────────

/// Immutable description of an installable plugin.
///
/// Construct through [`PluginDefinition::builder`], which validates internal
/// consistency (no self-dependency, no duplicate file destinations, at least
/// one supported base template).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDefinition {
    pub name: String,
    pub display_name: String,
    pub category: PluginCategory,
    pub description: String,
    pub version: String,
    /// Base template ids this plugin may be added to.
    pub supported_templates: BTreeSet<String>,
    /// Other plugin names required when this plugin is installed,
    /// in declaration order.
    pub dependencies: Vec<String>,
    /// Plugin names that must not be simultaneously installed.
    pub conflicts: Vec<String>,
    pub packages: PackageSet,
    pub config_schema: Option<ConfigSchema>,
    pub env_vars: Vec<EnvVar>,
    pub files: Vec<FileSpec>,
    pub integrations: Vec<Integration>,
    /// Template string shown to the user after a successful install.
    pub post_install: Option<String>,
}

impl PluginDefinition {
    pub fn builder(name: impl Into<String>) -> PluginDefinitionBuilder {
        PluginDefinitionBuilder::new(name)
    }

    /// Whether this plugin may be added to a project using `template`.
    pub fn supports_template(&self, template: &str) -> bool {
        self.supported_templates.contains(template)
    }
}

/// Builder for [`PluginDefinition`].
#[derive(Debug, Default)]
pub struct PluginDefinitionBuilder {
    name: String,
    display_name: Option<String>,
    category: Option<PluginCategory>,
    description: String,
    version: String,
    supported_templates: BTreeSet<String>,
    dependencies: Vec<String>,
    conflicts: Vec<String>,
    packages: PackageSet,
    config_schema: Option<ConfigSchema>,
    env_vars: Vec<EnvVar>,
    files: Vec<FileSpec>,
    integrations: Vec<Integration>,
    post_install: Option<String>,
}

impl PluginDefinitionBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "0.1.0".to_string(),
            ..Default::default()
        }
    }

    pub fn display_name(mut self, value: impl Into<String>) -> Self {
        self.display_name = Some(value.into());
        self
    }

    pub fn category(mut self, value: PluginCategory) -> Self {
        self.category = Some(value);
        self
    }

    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = value.into();
        self
    }

    pub fn version(mut self, value: impl Into<String>) -> Self {
        self.version = value.into();
        self
    }

    pub fn supports(mut self, template: impl Into<String>) -> Self {
        self.supported_templates.insert(template.into());
        self
    }

    pub fn depends_on(mut self, plugin: impl Into<String>) -> Self {
        self.dependencies.push(plugin.into());
        self
    }

    pub fn conflicts_with(mut self, plugin: impl Into<String>) -> Self {
        self.conflicts.push(plugin.into());
        self
    }

    pub fn package(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.packages.dependencies.push(PackageSpec::new(name, version));
        self
    }

    pub fn dev_package(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.packages
            .dev_dependencies
            .push(PackageSpec::new(name, version));
        self
    }

    pub fn config_schema(mut self, schema: ConfigSchema) -> Self {
        self.config_schema = Some(schema);
        self
    }

    pub fn env_var(mut self, var: EnvVar) -> Self {
        self.env_vars.push(var);
        self
    }

    pub fn file(mut self, spec: FileSpec) -> Self {
        self.files.push(spec);
        self
    }

    pub fn integration(mut self, integration: Integration) -> Self {
        self.integrations.push(integration);
        self
    }

    pub fn post_install(mut self, note: impl Into<String>) -> Self {
        self.post_install = Some(note.into());
        self
    }

    /// Finalise the definition, validating internal consistency.
    pub fn build(self) -> Result<PluginDefinition, DomainError> {
        let invalid = |reason: String| DomainError::InvalidDefinition {
            name: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("plugin name must not be empty".into()));
        }
        if self
            .name
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        {
            return Err(invalid(format!(
                "plugin name '{}' contains invalid characters",
                self.name
            )));
        }
        if self.supported_templates.is_empty() {
            return Err(invalid("at least one supported template is required".into()));
        }
        if self.dependencies.iter().any(|d| d == &self.name) {
            return Err(invalid("plugin cannot depend on itself".into()));
        }
        if let Some(both) = self.dependencies.iter().find(|d| self.conflicts.contains(d)) {
            return Err(invalid(format!(
                "'{both}' is listed both as a dependency and a conflict"
            )));
        }

        // Duplicate raw destinations within the plugin's own files.
        // Paths are template strings; duplicates after rendering are caught
        // by the file writer's overwrite policy instead.
        let mut seen = BTreeSet::new();
        for spec in &self.files {
            if !seen.insert(spec.path.as_str()) {
                return Err(invalid(format!("duplicate file destination '{}'", spec.path)));
            }
        }

        Ok(PluginDefinition {
            display_name: self.display_name.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            category: self.category.unwrap_or(PluginCategory::Api),
            description: self.description,
            version: self.version,
            supported_templates: self.supported_templates,
            dependencies: self.dependencies,
            conflicts: self.conflicts,
            packages: self.packages,
            config_schema: self.config_schema,
            env_vars: self.env_vars,
            files: self.files,
            integrations: self.integrations,
            post_install: self.post_install,
        })
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
