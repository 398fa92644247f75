//! Per-plugin option schemas.
//!
//! Plugins describe their user-configurable options with a [`ConfigSchema`]:
//! an ordered list of typed fields with optional defaults and allowed-value
//! sets.  Resolution validates a user-supplied option object, fills in
//! defaults, and reports *every* violation at once so the caller can present
//! the full list (interactive prompts, CI logs).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::OptionMap;

/// Primitive type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Boolean,
    Number,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Boolean => write!(f, "boolean"),
            Self::Number => write!(f, "number"),
        }
    }
}

impl FieldKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Number => value.is_number(),
        }
    }
}

/// One field in a plugin's option schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub description: String,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<Value>,
    /// Closed value set; empty means any value of the right type.
    pub allowed: Vec<Value>,
}

impl SchemaField {
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            required: false,
            default: None,
            allowed: Vec::new(),
        }
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn one_of<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed = values.into_iter().map(Into::into).collect();
        self
    }
}

/// A single schema violation, attributed to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validator/defaulter for a plugin's user-supplied options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSchema {
    fields: Vec<SchemaField>,
}

impl ConfigSchema {
    pub fn new(fields: Vec<SchemaField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Validate `supplied` against the schema and fill in defaults.
    ///
    /// Collects every violation instead of stopping at the first:
    /// unknown keys, type mismatches, values outside the allowed set,
    /// and missing required fields without a default.
    pub fn resolve(&self, supplied: &OptionMap) -> Result<OptionMap, Vec<FieldViolation>> {
        let mut resolved = OptionMap::new();
        let mut violations = Vec::new();

        for (key, _) in supplied {
            if !self.fields.iter().any(|f| &f.name == key) {
                violations.push(FieldViolation {
                    field: key.clone(),
                    message: "unknown option".into(),
                });
            }
        }

        for field in &self.fields {
            match supplied.get(&field.name) {
                Some(value) => {
                    if !field.kind.matches(value) {
                        violations.push(FieldViolation {
                            field: field.name.clone(),
                            message: format!("expected {}, got {}", field.kind, type_name(value)),
                        });
                        continue;
                    }
                    if !field.allowed.is_empty() && !field.allowed.contains(value) {
                        violations.push(FieldViolation {
                            field: field.name.clone(),
                            message: format!(
                                "must be one of: {}",
                                field
                                    .allowed
                                    .iter()
                                    .map(render_value)
                                    .collect::<Vec<_>>()
                                    .join(", ")
                            ),
                        });
                        continue;
                    }
                    resolved.insert(field.name.clone(), value.clone());
                }
                None => match &field.default {
                    Some(default) => {
                        resolved.insert(field.name.clone(), default.clone());
                    }
                    None if field.required => {
                        violations.push(FieldViolation {
                            field: field.name.clone(),
                            message: "required option is missing".into(),
                        });
                    }
                    None => {}
                },
            }
        }

        if violations.is_empty() {
            Ok(resolved)
        } else {
            Err(violations)
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
