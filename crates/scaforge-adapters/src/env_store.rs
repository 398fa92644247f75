//! Environment-variable bookkeeping over `.env.example`.
//!
//! Each plugin owns one marked section of the file:
//!
//! ```text
//! # >>> scaforge:prisma
//! # Connection string (required)
//! DATABASE_URL=
//! # <<< scaforge:prisma
//! ```
//!
//! Upserting replaces the plugin's section in place; removal deletes it and
//! reports which variable names went with it. Text outside the markers is
//! never touched, so hand-edited entries survive.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use tracing::debug;

use scaforge_core::{
    application::{ApplicationError, ports::EnvVarStore},
    domain::EnvVar,
    error::ScaforgeResult,
};

const ENV_FILE: &str = ".env.example";

fn section_open(plugin: &str) -> String {
    format!("# >>> scaforge:{plugin}")
}

fn section_close(plugin: &str) -> String {
    format!("# <<< scaforge:{plugin}")
}

/// Render a plugin's section body.
fn render_section(plugin: &str, vars: &[EnvVar]) -> String {
    let mut out = String::new();
    out.push_str(&section_open(plugin));
    out.push('\n');
    for var in vars {
        if !var.description.is_empty() {
            out.push_str("# ");
            out.push_str(&var.description);
            if var.required {
                out.push_str(" (required)");
            }
            out.push('\n');
        }
        out.push_str(&var.name);
        out.push('=');
        // Secrets never get a value written, even if a default exists.
        if !var.secret {
            if let Some(default) = &var.default {
                out.push_str(default);
            }
        }
        out.push('\n');
    }
    out.push_str(&section_close(plugin));
    out.push('\n');
    out
}

/// Split `content` into (text without the plugin's section, names of the
/// variables the section declared).
fn strip_section(content: &str, plugin: &str) -> (String, Vec<String>) {
    let open = section_open(plugin);
    let close = section_close(plugin);

    let mut kept = String::new();
    let mut removed_names = Vec::new();
    let mut inside = false;

    for line in content.lines() {
        if line.trim() == open {
            inside = true;
            continue;
        }
        if line.trim() == close {
            inside = false;
            continue;
        }
        if inside {
            if let Some((name, _)) = line.split_once('=') {
                let name = name.trim();
                if !name.is_empty() && !name.starts_with('#') {
                    removed_names.push(name.to_string());
                }
            }
            continue;
        }
        kept.push_str(line);
        kept.push('\n');
    }

    // Collapse a trailing blank run left behind by the removal.
    while kept.ends_with("\n\n") {
        kept.pop();
    }
    (kept, removed_names)
}

/// Production store writing `.env.example` under the project root.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvFileStore;

impl EnvFileStore {
    pub fn new() -> Self {
        Self
    }

    fn env_path(project_root: &Path) -> PathBuf {
        project_root.join(ENV_FILE)
    }

    fn read(path: &Path) -> ScaforgeResult<String> {
        if !path.exists() {
            return Ok(String::new());
        }
        std::fs::read_to_string(path).map_err(|e| {
            ApplicationError::EnvStoreFailed {
                reason: format!("could not read {}: {}", path.display(), e),
            }
            .into()
        })
    }

    fn write(path: &Path, content: &str) -> ScaforgeResult<()> {
        std::fs::write(path, content).map_err(|e| {
            ApplicationError::EnvStoreFailed {
                reason: format!("could not write {}: {}", path.display(), e),
            }
            .into()
        })
    }
}

impl EnvVarStore for EnvFileStore {
    fn upsert_for_plugin(
        &self,
        project_root: &Path,
        plugin: &str,
        vars: &[EnvVar],
    ) -> ScaforgeResult<()> {
        let path = Self::env_path(project_root);
        let current = Self::read(&path)?;
        let (mut kept, _) = strip_section(&current, plugin);

        if !kept.is_empty() && !kept.ends_with('\n') {
            kept.push('\n');
        }
        if !kept.is_empty() {
            kept.push('\n');
        }
        kept.push_str(&render_section(plugin, vars));

        debug!(plugin = %plugin, vars = vars.len(), "updating env file");
        Self::write(&path, &kept)
    }

    fn remove_for_plugin(&self, project_root: &Path, plugin: &str) -> ScaforgeResult<Vec<String>> {
        let path = Self::env_path(project_root);
        let current = Self::read(&path)?;
        let (kept, removed) = strip_section(&current, plugin);

        if !removed.is_empty() || current != kept {
            Self::write(&path, &kept)?;
        }
        debug!(plugin = %plugin, removed = removed.len(), "env section removed");
        Ok(removed)
    }
}

/// In-memory store for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryEnvStore {
    sections: Arc<RwLock<BTreeMap<String, Vec<EnvVar>>>>,
}

impl MemoryEnvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variable names currently stored for a plugin (testing helper).
    pub fn names_of(&self, plugin: &str) -> Vec<String> {
        self.sections
            .read()
            .ok()
            .and_then(|sections| {
                sections
                    .get(plugin)
                    .map(|vars| vars.iter().map(|v| v.name.clone()).collect())
            })
            .unwrap_or_default()
    }
}

impl EnvVarStore for MemoryEnvStore {
    fn upsert_for_plugin(
        &self,
        _project_root: &Path,
        plugin: &str,
        vars: &[EnvVar],
    ) -> ScaforgeResult<()> {
        self.sections
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?
            .insert(plugin.to_string(), vars.to_vec());
        Ok(())
    }

    fn remove_for_plugin(&self, _project_root: &Path, plugin: &str) -> ScaforgeResult<Vec<String>> {
        let removed = self
            .sections
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?
            .remove(plugin)
            .map(|vars| vars.into_iter().map(|v| v.name).collect())
            .unwrap_or_default();
        Ok(removed)
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
