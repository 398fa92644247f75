//! Core domain layer for Scaforge.
//!
//! This module contains pure business logic with no I/O: plugin definitions,
//! the registry catalog, option schemas, and the persisted project
//! configuration.  All side effects (package installs, file writes, config
//! persistence) are handled via ports (traits) defined in the application
//! layer.
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: no filesystem, network, or external calls
//! - **Minimal dependencies**: std + thiserror + serde
//! - **Immutable definitions**: a registered [`PluginDefinition`] never changes

pub mod config;
pub mod error;
pub mod plugin;
pub mod registry;
pub mod schema;

// Re-exports for convenience
pub use config::{OptionMap, PluginState, ScaforgeConfig};
pub use error::{DomainError, ErrorCategory};
pub use plugin::{
    EnvVar, FileCondition, FileSpec, Integration, PackageSet, PackageSpec, PluginCategory,
    PluginDefinition, PluginDefinitionBuilder,
};
pub use registry::PluginRegistry;
pub use schema::{ConfigSchema, FieldKind, FieldViolation, SchemaField};
