use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (validation reports keep rendered copies)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
///
/// The `Display` strings double as the messages collected by
/// `validate_add`/`validate_remove`, so their wording is part of the
/// contract with callers that match on substrings.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Registration
    // ========================================================================
    #[error("Plugin '{name}' is already registered")]
    DuplicatePlugin { name: String },

    #[error("Invalid plugin definition '{name}': {reason}")]
    InvalidDefinition { name: String, reason: String },

    // ========================================================================
    // Add validation
    // ========================================================================
    #[error("Plugin '{name}' not found in registry")]
    PluginNotFound { name: String },

    #[error("Plugin '{plugin}' does not support {template} template")]
    TemplateIncompatible { plugin: String, template: String },

    #[error("Plugin '{name}' is already installed")]
    AlreadyInstalled { name: String },

    #[error("Plugin '{plugin}' conflicts with installed plugins: {}", conflicting.join(", "))]
    Conflict {
        plugin: String,
        conflicting: Vec<String>,
    },

    // ========================================================================
    // Remove validation
    // ========================================================================
    #[error("Plugin '{name}' is not installed")]
    NotInstalled { name: String },

    #[error("Cannot remove \"{name}\": required by {}", dependents.join(", "))]
    DependentsExist {
        name: String,
        dependents: Vec<String>,
    },

    // ========================================================================
    // Resolution and rendering
    // ========================================================================
    #[error("Cyclic plugin dependency: {}", chain.join(" -> "))]
    CyclicDependency { chain: Vec<String> },

    #[error("Invalid options for plugin '{plugin}': {}", violations.join("; "))]
    SchemaValidation {
        plugin: String,
        violations: Vec<String>,
    },

    #[error("Template syntax error in plugin '{plugin}' ({path}): {reason}")]
    TemplateSyntax {
        plugin: String,
        path: String,
        reason: String,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::PluginNotFound { name } => vec![
                format!("No plugin named '{}' is registered", name),
                "Try: scaforge list".into(),
            ],
            Self::TemplateIncompatible { plugin, template } => vec![
                format!("'{}' cannot be added to a {} project", plugin, template),
                format!("Check supported templates with: scaforge info {}", plugin),
            ],
            Self::AlreadyInstalled { name } => vec![
                format!("'{}' is already part of this project", name),
                format!(
                    "Remove it first if you want a fresh install: scaforge remove {}",
                    name
                ),
            ],
            Self::Conflict { conflicting, .. } => vec![
                format!("Conflicting plugins installed: {}", conflicting.join(", ")),
                "Remove the conflicting plugin before adding this one".into(),
            ],
            Self::NotInstalled { name } => vec![
                format!("'{}' is not installed in this project", name),
                "See what is installed with: scaforge list --installed".into(),
            ],
            Self::DependentsExist { dependents, .. } => vec![
                format!("Still required by: {}", dependents.join(", ")),
                "Remove the dependent plugins first".into(),
            ],
            Self::CyclicDependency { chain } => vec![
                format!("Dependency cycle: {}", chain.join(" -> ")),
                "This is a bug in the plugin definitions; report it to the plugin author".into(),
            ],
            Self::SchemaValidation { violations, .. } => {
                let mut out = vec!["Fix the following options:".to_string()];
                out.extend(violations.iter().map(|v| format!("  • {v}")));
                out
            }
            Self::TemplateSyntax { plugin, path, .. } => vec![
                format!("The '{}' plugin ships a broken template ({})", plugin, path),
                "Report this to the plugin author".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PluginNotFound { .. } => ErrorCategory::NotFound,
            Self::TemplateIncompatible { .. } | Self::Conflict { .. } => {
                ErrorCategory::Compatibility
            }
            Self::AlreadyInstalled { .. }
            | Self::NotInstalled { .. }
            | Self::DependentsExist { .. }
            | Self::SchemaValidation { .. }
            | Self::DuplicatePlugin { .. }
            | Self::InvalidDefinition { .. } => ErrorCategory::Validation,
            Self::CyclicDependency { .. } | Self::TemplateSyntax { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Internal,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_contract_substrings() {
        let not_found = DomainError::PluginNotFound {
            name: "prisma".into(),
        };
        assert!(not_found.to_string().contains("not found in registry"));

        let incompatible = DomainError::TemplateIncompatible {
            plugin: "prisma".into(),
            template: "astro".into(),
        };
        assert!(
            incompatible
                .to_string()
                .contains("does not support astro template")
        );

        let conflict = DomainError::Conflict {
            plugin: "apollo".into(),
            conflicting: vec!["trpc".into()],
        };
        assert!(
            conflict
                .to_string()
                .contains("conflicts with installed plugins")
        );

        let dependents = DomainError::DependentsExist {
            name: "db".into(),
            dependents: vec!["auth".into(), "cms".into()],
        };
        assert_eq!(
            dependents.to_string(),
            "Cannot remove \"db\": required by auth, cms"
        );

        let not_installed = DomainError::NotInstalled { name: "db".into() };
        assert!(not_installed.to_string().contains("not installed"));
    }

    #[test]
    fn cyclic_dependency_names_the_chain() {
        let err = DomainError::CyclicDependency {
            chain: vec!["a".into(), "b".into(), "a".into()],
        };
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn categories() {
        assert_eq!(
            DomainError::PluginNotFound { name: "x".into() }.category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            DomainError::Conflict {
                plugin: "x".into(),
                conflicting: vec![]
            }
            .category(),
            ErrorCategory::Compatibility
        );
        assert_eq!(
            DomainError::TemplateSyntax {
                plugin: "x".into(),
                path: "f".into(),
                reason: "r".into()
            }
            .category(),
            ErrorCategory::Internal
        );
    }
}
