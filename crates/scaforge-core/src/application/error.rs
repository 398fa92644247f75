//! Application layer errors.
//!
//! These errors represent failures in orchestration or in collaborator
//! calls, not business logic. Business logic errors are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The package manager shell-out failed.
    #[error("Package {operation} failed: {reason}")]
    PackageManagerFailed { operation: String, reason: String },

    /// A file could not be written.
    #[error("Failed to write {path}: {reason}")]
    FileWriteFailed { path: PathBuf, reason: String },

    /// Emission target exists and the file is not marked overwritable.
    #[error("File already exists: {path}")]
    FileExists { path: PathBuf },

    /// The `.env.example` store failed.
    #[error("Environment file error: {reason}")]
    EnvStoreFailed { reason: String },

    /// The project configuration could not be loaded or saved.
    #[error("Project configuration error: {reason}")]
    ConfigStoreFailed { reason: String },

    /// No project configuration found at the given root.
    #[error("No scaforge project found at {path}")]
    ProjectNotFound { path: PathBuf },

    /// Shared adapter state was poisoned (a writer panicked).
    #[error("Adapter state lock poisoned")]
    LockPoisoned,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::PackageManagerFailed { operation, reason } => vec![
                format!("Package {operation} failed: {reason}"),
                "Check that your package manager is installed and on PATH".into(),
                "Re-run with --skip-install to update files without touching packages".into(),
            ],
            Self::FileWriteFailed { path, .. } => vec![
                format!("Failed to write: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::FileExists { path } => vec![
                format!("Refusing to overwrite: {}", path.display()),
                "Move the file out of the way, or remove and re-add the plugin".into(),
            ],
            Self::EnvStoreFailed { reason } => vec![
                format!(".env.example could not be updated: {reason}"),
                "Check the file is not locked by another process".into(),
            ],
            Self::ConfigStoreFailed { reason } => vec![
                format!("scaforge.config.json problem: {reason}"),
                "Check the file is valid JSON".into(),
            ],
            Self::ProjectNotFound { path } => vec![
                format!("No scaforge.config.json under {}", path.display()),
                "Initialise one with: scaforge init <name> --template <id>".into(),
            ],
            Self::LockPoisoned => vec!["Try again; if it persists this is a bug".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectNotFound { .. } => ErrorCategory::NotFound,
            Self::FileExists { .. } => ErrorCategory::Validation,
            Self::ConfigStoreFailed { .. } => ErrorCategory::Configuration,
            Self::PackageManagerFailed { .. }
            | Self::FileWriteFailed { .. }
            | Self::EnvStoreFailed { .. }
            | Self::LockPoisoned => ErrorCategory::Internal,
        }
    }
}
