//! Application layer for Scaforge.
//!
//! This layer contains:
//! - **Services**: use case orchestration (PluginManager)
//! - **Ports**: interface definitions (traits) for external collaborators
//! - **Errors**: application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{AddOutcome, PluginManager, RemoveOutcome, ValidationReport};

// Re-export port traits (for adapter implementation)
pub use ports::{ConfigStore, EnvVarStore, FileWriter, PackageInstaller};

pub use error::ApplicationError;
