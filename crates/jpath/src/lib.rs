//! A small, JSON-native path language.
//!
//! Paths are dot-separated segments evaluated left to right against a
//! `serde_json::Value`:
//!
//! - `spec.names.kind` walks object keys (numeric keys index arrays),
//! - `spec.versions.#` is the length of an array,
//! - `spec.versions.#.name` projects `name` out of every element,
//! - `items.#(kind=="Service").name` / `items.#(port>80)#.name` query elements,
//! - `labels.app*` matches keys with `*` and `?` wildcards,
//! - `@reverse`, `@keys`, `@values`, `@flatten` and `@this` modify the current value.
//!
//! A path that does not match yields `None`, which is distinct from matching
//! an empty array.

pub mod ast;
pub mod engine;
pub mod error;
pub mod functions;
mod parser;

// --- Public API ---
pub use ast::{CompareOp, Path, PathSegment, Predicate};
pub use engine::{select, wildcard_match};
pub use error::JPathError;
pub use functions::{JPathModifier, ModifierRegistry};
pub use parser::parse_path;

use serde_json::Value;

/// Parses `path` and selects it from `document` in one step.
pub fn get(document: &Value, path: &str) -> Result<Option<Value>, JPathError> {
    let parsed = parse_path(path)?;
    Ok(select(document, &parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn crd() -> Value {
        json!({
            "apiVersion": "apiextensions.k8s.io/v1beta1",
            "kind": "CustomResourceDefinition",
            "metadata": { "name": "etcdrestores.etcd.database.coreos.com" },
            "spec": {
                "group": "etcd.database.coreos.com",
                "names": { "kind": "EtcdRestore", "listKind": "EtcdRestoreList", "plural": "etcdrestores", "singular": "etcdrestore" },
                "scope": "Namespaced",
                "versions": [
                    { "name": "v1beta1", "served": true, "storage": true },
                    { "name": "v1", "served": true, "storage": false }
                ]
            }
        })
    }

    #[test]
    fn test_parse_and_select_simple_path() {
        let result = get(&crd(), "spec.group").unwrap();
        assert_eq!(result, Some(json!("etcd.database.coreos.com")));
    }

    #[test]
    fn test_parse_and_select_projection() {
        let result = get(&crd(), "spec.versions.#.name").unwrap();
        assert_eq!(result, Some(json!(["v1beta1", "v1"])));
    }

    #[test]
    fn test_parse_and_select_query() {
        let result = get(&crd(), "spec.versions.#(storage==true).name").unwrap();
        assert_eq!(result, Some(json!("v1beta1")));
    }

    #[test]
    fn test_this_modifier_selects_whole_document() {
        let data = crd();
        assert_eq!(get(&data, "@this").unwrap(), Some(data.clone()));
    }

    #[test]
    fn test_invalid_path_is_an_error() {
        assert!(get(&crd(), "spec..group").is_err());
    }
}
