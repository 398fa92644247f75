//! Application ports (traits) for external collaborators.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `scaforge-adapters` implement
//! these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: called by the application, implemented by
//!   infrastructure
//!   - `PackageInstaller`: package-manager shell-out
//!   - `EnvVarStore`: `.env.example` bookkeeping
//!   - `FileWriter`: file emission
//!   - `ConfigStore`: project configuration persistence
//!
//! - **Driving (Input) Ports**: called by the external world, implemented
//!   by the application (defined in the CLI layer)

pub mod output;

pub use output::{ConfigStore, EnvVarStore, FileWriter, PackageInstaller};
