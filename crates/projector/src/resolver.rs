//! The seam between the projector and the path language.
use discovery_jpath::{JPathError, Path, parse_path, select};
use serde_json::Value;

/// The result of resolving one path: the matched value, or nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    value: Option<Value>,
}

impl Fragment {
    /// A fragment for a path that matched nothing.
    pub fn missing() -> Self {
        Fragment { value: None }
    }

    pub fn new(value: Value) -> Self {
        Fragment { value: Some(value) }
    }

    pub fn is_match(&self) -> bool {
        self.value.is_some()
    }

    /// True only for a matched JSON array, including an empty one.
    pub fn is_array(&self) -> bool {
        matches!(self.value, Some(Value::Array(_)))
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The matched value, with `null` standing in for no match.
    pub fn into_value(self) -> Value {
        self.value.unwrap_or(Value::Null)
    }
}

impl From<Option<Value>> for Fragment {
    fn from(value: Option<Value>) -> Self {
        Fragment { value }
    }
}

/// A path language the projector can evaluate.
///
/// Paths are compiled once when the projector is built, then resolved
/// against every input.
pub trait PathResolver: Send + Sync {
    type Query: Send + Sync;
    type Error: std::error::Error + Send + Sync + 'static;

    fn compile(&self, path: &str) -> Result<Self::Query, Self::Error>;

    fn resolve(&self, document: &Value, query: &Self::Query) -> Fragment;
}

/// The default resolver, backed by `discovery-jpath`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JPathResolver;

impl PathResolver for JPathResolver {
    type Query = Path;
    type Error = JPathError;

    fn compile(&self, path: &str) -> Result<Path, JPathError> {
        parse_path(path)
    }

    fn resolve(&self, document: &Value, query: &Path) -> Fragment {
        select(document, query).into()
    }
}
