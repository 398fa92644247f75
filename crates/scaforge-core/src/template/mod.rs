//! Conditional template renderer.
//!
//! Turns a template string plus a [`BindingContext`] into final text.  Used
//! for plugin file bodies, destination paths, and post-install notes.
//!
//! Supported constructs:
//!
//! - `{{dotted.path}}` — variable interpolation, looked up in the context.
//!   Missing paths render as empty string (never an error): plugin options
//!   are frequently optional and templates must tolerate their absence.
//! - `{{#if <expr>}} … {{else}} … {{/if}}` — conditional blocks, nested to
//!   arbitrary depth.  The `{{else}}` branch is optional.
//! - `<expr>` — a helper call from the closed set `eq`, `and`, `or`,
//!   `hasPlugin`, or a bare dotted path tested for truthiness.  Arguments
//!   are string/number/boolean literals, paths, or nested calls.
//!
//! Malformed input (unterminated tags, unknown helpers, unbalanced blocks)
//! is always a hard [`TemplateError`]; a broken template must not silently
//! produce wrong code.  Rendering is pure: the same template and context
//! always yield byte-identical output.

mod expr;
mod lexer;
mod render;

pub use expr::{Expr, Helper};
pub use render::render;

use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;

use crate::domain::OptionMap;

/// Failure while lexing, parsing, or rendering a template.
///
/// Carries only the reason; the plugin manager wraps it with the offending
/// plugin name and file path before surfacing it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TemplateError {
    pub message: String,
}

impl TemplateError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Facts available to a template while rendering.
///
/// Immutable for the duration of one render.  Lookup roots:
///
/// | Root                | Resolves to                         |
/// |---------------------|-------------------------------------|
/// | `template`          | base template id (string)           |
/// | `options.<field>`   | the plugin's resolved options       |
/// | `config.name`       | project name                        |
/// | `config.template`   | base template id (alias)            |
#[derive(Debug, Clone)]
pub struct BindingContext {
    template: String,
    options: Value,
    config: Value,
    installed_plugins: BTreeSet<String>,
}

impl BindingContext {
    pub fn new(
        template: impl Into<String>,
        options: OptionMap,
        project_name: impl Into<String>,
        installed_plugins: impl IntoIterator<Item = String>,
    ) -> Self {
        let template = template.into();
        let mut config = OptionMap::new();
        config.insert("name".into(), Value::String(project_name.into()));
        config.insert("template".into(), Value::String(template.clone()));

        Self {
            template,
            options: Value::Object(options),
            config: Value::Object(config),
            installed_plugins: installed_plugins.into_iter().collect(),
        }
    }

    /// Resolve a dotted path.  Unknown roots and missing segments yield
    /// `Value::Null` so interpolation can render them as empty string.
    pub fn lookup(&self, path: &str) -> Value {
        let mut segments = path.split('.');
        let root = match segments.next() {
            Some(r) => r,
            None => return Value::Null,
        };

        let mut current = match root {
            "template" => return Value::String(self.template.clone()),
            "options" => &self.options,
            "config" => &self.config,
            _ => return Value::Null,
        };

        for segment in segments {
            match current.get(segment) {
                Some(next) => current = next,
                None => return Value::Null,
            }
        }
        current.clone()
    }

    /// Membership test backing the `hasPlugin` helper.
    pub fn has_plugin(&self, name: &str) -> bool {
        self.installed_plugins.contains(name)
    }
}

/// Truthiness rules shared by `{{#if}}` guards and `and`/`or` helpers.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
