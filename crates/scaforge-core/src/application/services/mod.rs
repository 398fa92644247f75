//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "add a plugin to this project".

pub mod plugin_manager;

pub use plugin_manager::{AddOutcome, PluginManager, RemoveOutcome, ValidationReport};
