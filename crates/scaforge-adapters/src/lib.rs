//! Infrastructure adapters for Scaforge.
//!
//! This crate implements the ports defined in
//! `scaforge-core::application::ports`.  It contains all external
//! dependencies and I/O operations: the package-manager shell-out, the
//! `.env.example` store, file emission, and `scaforge.config.json`
//! persistence.  Each port ships a production adapter and an in-memory
//! double for tests.

pub mod builtin_plugins;
pub mod config_store;
pub mod env_store;
pub mod file_writer;
pub mod installer;

// Re-export commonly used adapters
pub use builtin_plugins::register_builtins;
pub use config_store::{JsonConfigStore, MemoryConfigStore};
pub use env_store::{EnvFileStore, MemoryEnvStore};
pub use file_writer::{LocalFileWriter, MemoryFileWriter};
pub use installer::{MemoryInstaller, NoopInstaller, PackageManager, ShellInstaller};
