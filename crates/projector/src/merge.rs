//! Places resolved values under output keys.
//!
//! Output keys are paths too: `metadata.name` writes `{"metadata":{"name":…}}`
//! and `\` escapes the next character, so `\.` keeps a literal dot inside a key.
use crate::error::MergeError;
use serde_json::{Map, Value};

/// Splits an output key on unescaped dots. Unescaped `*` and `?` are
/// rejected since they cannot name a single key.
pub fn split_key(key: &str) -> Result<Vec<String>, MergeError> {
    if key.is_empty() {
        return Err(MergeError::EmptyKey);
    }
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = key.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => return Err(MergeError::DanglingEscape(key.to_string())),
            },
            '.' => segments.push(std::mem::take(&mut current)),
            '*' | '?' => return Err(MergeError::WildcardKey(key.to_string())),
            _ => current.push(c),
        }
    }
    segments.push(current);

    if segments.iter().any(String::is_empty) {
        return Err(MergeError::EmptySegment(key.to_string()));
    }
    Ok(segments)
}

/// Inserts or overwrites `key` in `object`, creating intermediate objects as
/// needed. An intermediate holding anything other than an object is replaced
/// by a fresh object. On error `object` is left unchanged.
pub fn set_path(object: &mut Map<String, Value>, key: &str, value: Value) -> Result<(), MergeError> {
    let segments = split_key(key)?;
    insert_at(object, &segments, value);
    Ok(())
}

fn insert_at(object: &mut Map<String, Value>, segments: &[String], value: Value) {
    match segments {
        [] => {}
        [last] => {
            object.insert(last.clone(), value);
        }
        [head, rest @ ..] => {
            let child = object
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(inner) = child {
                insert_at(inner, rest, value);
            }
        }
    }
}
