//! Defines the registry and built-in implementations for JPath modifiers.
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// The signature for a modifier implementation. `None` means no match.
pub type JPathModifier = fn(value: &Value) -> Option<Value>;

/// A registry to hold all available `@modifiers`.
pub struct ModifierRegistry {
    modifiers: HashMap<String, JPathModifier>,
}

static BUILTINS: LazyLock<ModifierRegistry> = LazyLock::new(ModifierRegistry::default);

impl ModifierRegistry {
    /// Creates a new, empty modifier registry.
    pub fn new() -> Self {
        Self { modifiers: HashMap::new() }
    }

    /// The shared registry holding the built-in modifiers.
    pub fn builtins() -> &'static ModifierRegistry {
        &BUILTINS
    }

    /// Registers a new modifier.
    pub fn register(&mut self, name: &str, modifier: JPathModifier) {
        self.modifiers.insert(name.to_lowercase(), modifier);
    }

    /// Finds a modifier by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&JPathModifier> {
        self.modifiers.get(&name.to_lowercase())
    }
}

// --- Built-in Modifier Implementations ---

fn this(value: &Value) -> Option<Value> {
    Some(value.clone())
}

fn reverse(value: &Value) -> Option<Value> {
    match value {
        Value::Array(items) => Some(Value::Array(items.iter().rev().cloned().collect())),
        Value::Object(map) => Some(Value::Object(
            map.iter().rev().map(|(k, v)| (k.clone(), v.clone())).collect(),
        )),
        other => Some(other.clone()),
    }
}

fn keys(value: &Value) -> Option<Value> {
    value
        .as_object()
        .map(|map| Value::Array(map.keys().cloned().map(Value::String).collect()))
}

fn values(value: &Value) -> Option<Value> {
    value
        .as_object()
        .map(|map| Value::Array(map.values().cloned().collect()))
}

// Shallow: only one level of nesting is removed.
fn flatten(value: &Value) -> Option<Value> {
    let items = value.as_array()?;
    let mut flat = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Array(inner) => flat.extend(inner.iter().cloned()),
            other => flat.push(other.clone()),
        }
    }
    Some(Value::Array(flat))
}

impl Default for ModifierRegistry {
    /// Creates a new registry populated with all built-in modifiers.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("this", this);
        registry.register("reverse", reverse);
        registry.register("keys", keys);
        registry.register("values", values);
        registry.register("flatten", flatten);
        registry
    }
}
