//! # Scaforge Core
//!
//! Core domain logic and application services for Scaforge, the plugin-based
//! project scaffolding tool.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//!
//! - **Domain**: plugin definitions, the registry, option schemas, project
//!   configuration. Pure business logic with no I/O.
//! - **Template**: the conditional micro-language used by plugin file
//!   templates (`{{path}}` interpolation, `{{#if}}` blocks, helpers).
//! - **Application**: the [`PluginManager`](application::PluginManager)
//!   orchestrator and the ports it drives.
//!
//! The core never touches the filesystem, network, or process table; all
//! side effects flow through the port traits in [`application::ports`],
//! implemented by the `scaforge-adapters` crate.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use scaforge_core::domain::{PluginDefinition, PluginCategory, PluginRegistry, ScaforgeConfig};
//!
//! let mut registry = PluginRegistry::new();
//! let prisma = PluginDefinition::builder("prisma")
//!     .display_name("Prisma")
//!     .category(PluginCategory::Database)
//!     .supports("nextjs")
//!     .build()
//!     .unwrap();
//! registry.register(prisma).unwrap();
//!
//! let config = ScaforgeConfig::new("my-app", "nextjs");
//! let registry = Arc::new(registry);
//! # let _ = (registry, config);
//! ```

pub mod application;
pub mod domain;
pub mod error;
pub mod template;

pub use error::{ErrorCategory, ScaforgeError, ScaforgeResult};

/// Crate version, sourced from Cargo.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commonly used types, for glob import in binaries and tests.
pub mod prelude {
    pub use crate::application::{
        AddOutcome, ConfigStore, EnvVarStore, FileWriter, PackageInstaller, PluginManager,
        RemoveOutcome, ValidationReport,
    };
    pub use crate::domain::{
        ConfigSchema, EnvVar, FileSpec, Integration, OptionMap, PackageSpec, PluginCategory,
        PluginDefinition, PluginRegistry, PluginState, ScaforgeConfig, SchemaField,
    };
    pub use crate::error::{ScaforgeError, ScaforgeResult};
    pub use crate::template::{BindingContext, render};
}
