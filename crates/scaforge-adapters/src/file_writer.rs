//! File emission adapters.
//!
//! Implements the `FileWriter` port: `LocalFileWriter` for production,
//! `MemoryFileWriter` for tests.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use tracing::debug;

use scaforge_core::{
    application::{ApplicationError, ports::FileWriter},
    error::ScaforgeResult,
};

/// Production file writer using `std::fs`.
///
/// Creates missing parent directories and refuses to replace an existing
/// file unless the caller passed `overwrite`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFileWriter;

impl LocalFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FileWriter for LocalFileWriter {
    fn write(&self, path: &Path, content: &str, overwrite: bool) -> ScaforgeResult<()> {
        if path.exists() && !overwrite {
            return Err(ApplicationError::FileExists {
                path: path.to_path_buf(),
            }
            .into());
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| map_io_error(parent, e, "create directory"))?;
            }
        }

        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))?;
        debug!(path = %path.display(), "file written");
        Ok(())
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> scaforge_core::ScaforgeError {
    ApplicationError::FileWriteFailed {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

/// In-memory file writer for testing.
#[derive(Debug, Clone)]
pub struct MemoryFileWriter {
    files: Arc<RwLock<HashMap<PathBuf, String>>>,
}

impl MemoryFileWriter {
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let files = self.files.read().ok()?;
        files.get(path).cloned()
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.files.read().is_ok_and(|f| f.contains_key(path))
    }

    /// All written paths, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let files = self.files.read().unwrap();
        let mut paths: Vec<_> = files.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Pre-seed a file, as if the project skeleton had created it.
    pub fn seed(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.write().unwrap().insert(path.into(), content.into());
    }
}

impl Default for MemoryFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FileWriter for MemoryFileWriter {
    fn write(&self, path: &Path, content: &str, overwrite: bool) -> ScaforgeResult<()> {
        let mut files = self
            .files
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        if files.contains_key(path) && !overwrite {
            return Err(ApplicationError::FileExists {
                path: path.to_path_buf(),
            }
            .into());
        }
        files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
