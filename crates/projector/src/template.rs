//! The template model: an ordered list of output keys and the paths that fill them.
use crate::error::{TemplateError, json_type_name};
use serde_json::Value;

/// How a resolved array is written into the outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    /// A bare path. An array result fans out into one output per element.
    Expand,
    /// A path wrapped in a one-element array. The result is embedded as-is.
    Inline,
}

/// One template entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub path: String,
    pub mode: FieldMode,
}

impl Field {
    fn from_spec(key: &str, spec: &Value) -> Result<Self, TemplateError> {
        let invalid = |reason: String| TemplateError::InvalidField {
            key: key.to_string(),
            reason,
        };
        let (path, mode) = match spec {
            Value::String(path) => (path.clone(), FieldMode::Expand),
            Value::Array(items) => match items.as_slice() {
                [Value::String(path)] => (path.clone(), FieldMode::Inline),
                [other] => {
                    return Err(invalid(format!(
                        "inline path must be a string, found {}",
                        json_type_name(other)
                    )));
                }
                _ => {
                    return Err(invalid(format!(
                        "inline form takes exactly one path, found {} elements",
                        items.len()
                    )));
                }
            },
            other => {
                return Err(invalid(format!(
                    "expected a path or a one-element array, found {}",
                    json_type_name(other)
                )));
            }
        };
        Ok(Field {
            key: key.to_string(),
            path,
            mode,
        })
    }
}

/// A parsed template. Fields keep the order they appear in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    fields: Vec<Field>,
}

impl Template {
    /// Parses a template from JSON text.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let value: Value = serde_json::from_str(source)?;
        Self::from_value(&value)
    }

    /// Builds a template from an already-parsed JSON object.
    pub fn from_value(value: &Value) -> Result<Self, TemplateError> {
        let Value::Object(map) = value else {
            return Err(TemplateError::NotAnObject(json_type_name(value)));
        };
        let fields = map
            .iter()
            .map(|(key, spec)| Field::from_spec(key, spec))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Template { fields })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
