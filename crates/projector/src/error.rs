use thiserror::Error;

/// Problems with the template itself. These are configuration errors and are
/// raised before any input is projected.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template is not valid JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Template must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("Invalid specification for field '{key}': {reason}")]
    InvalidField { key: String, reason: String },

    #[error("Invalid path '{path}' for field '{key}': {source}")]
    Path {
        key: String,
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("No template has been configured")]
    Missing,
}

/// Why a value could not be placed under an output key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("output key is empty")]
    EmptyKey,

    #[error("output key '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("output key '{0}' ends with a dangling escape")]
    DanglingEscape(String),

    #[error("output key '{0}' contains a wildcard")]
    WildcardKey(String),
}

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Input is not valid JSON: {0}")]
    InvalidInput(#[source] serde_json::Error),

    #[error("Failed to merge value for key '{key}': {source}")]
    MergeFailure {
        key: String,
        source: MergeError,
        partial: Vec<String>,
    },

    #[error("Expanding '{key}' would produce {requested} outputs, exceeding the limit of {limit}")]
    OutputLimitExceeded {
        key: String,
        requested: usize,
        limit: usize,
        partial: Vec<String>,
    },
}

impl ProjectError {
    /// The outputs completed before the failing field. Empty for template
    /// and input errors.
    pub fn partial_outputs(&self) -> &[String] {
        match self {
            ProjectError::MergeFailure { partial, .. }
            | ProjectError::OutputLimitExceeded { partial, .. } => partial,
            ProjectError::Template(_) | ProjectError::InvalidInput(_) => &[],
        }
    }

    /// True for operator errors (a bad template) as opposed to data errors.
    pub fn is_config_error(&self) -> bool {
        matches!(self, ProjectError::Template(_))
    }
}

/// A short name for the JSON type of `value`, used in error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
