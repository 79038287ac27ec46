//! Evaluates parsed paths against a JSON document.
use crate::ast::{CompareOp, Path, PathSegment, Predicate};
use crate::functions::ModifierRegistry;
use serde_json::Value;
use std::cmp::Ordering;

/// Selects the fragment a path points at. `None` means the path did not match.
pub fn select(document: &Value, path: &Path) -> Option<Value> {
    let result = walk(document, &path.segments);
    log::trace!("select {:?} -> {:?}", path.segments, result);
    result
}

fn walk(current: &Value, segments: &[PathSegment]) -> Option<Value> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(current.clone());
    };

    match first {
        PathSegment::Key(key) => child(current, key).and_then(|v| walk(v, rest)),
        PathSegment::Pattern(pattern) => current
            .as_object()?
            .iter()
            .find(|(k, _)| wildcard_match(pattern, k))
            .and_then(|(_, v)| walk(v, rest)),
        PathSegment::Hash => {
            let items = current.as_array()?;
            if rest.is_empty() {
                Some(Value::from(items.len()))
            } else {
                Some(project(items.iter(), rest))
            }
        }
        PathSegment::Query { predicate, all } => {
            let items = current.as_array()?;
            let mut matching = items.iter().filter(|item| predicate_holds(item, predicate));
            if *all {
                Some(project(matching, rest))
            } else {
                matching.next().and_then(|item| walk(item, rest))
            }
        }
        PathSegment::Modifier(name) => {
            let modifier = ModifierRegistry::builtins().get(name)?;
            walk(&modifier(current)?, rest)
        }
    }
}

/// Applies the remaining segments to every element, keeping only matches.
fn project<'a>(items: impl Iterator<Item = &'a Value>, rest: &[PathSegment]) -> Value {
    Value::Array(items.filter_map(|item| walk(item, rest)).collect())
}

fn child<'a>(current: &'a Value, key: &str) -> Option<&'a Value> {
    match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn predicate_holds(item: &Value, predicate: &Predicate) -> bool {
    let Some(actual) = walk(item, &predicate.field) else {
        return false;
    };
    let expected = &predicate.value;
    match predicate.op {
        CompareOp::Eq => loosely_equal(&actual, expected),
        CompareOp::Ne => !loosely_equal(&actual, expected),
        CompareOp::Lt => compare(&actual, expected) == Some(Ordering::Less),
        CompareOp::Le => matches!(
            compare(&actual, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        CompareOp::Gt => compare(&actual, expected) == Some(Ordering::Greater),
        CompareOp::Ge => matches!(
            compare(&actual, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        CompareOp::Like => match (actual.as_str(), expected.as_str()) {
            (Some(text), Some(pattern)) => wildcard_match(pattern, text),
            _ => false,
        },
    }
}

// Numbers compare by value, so `1` and `1.0` are equal.
fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Matches `text` against a pattern where `*` is any run, `?` any single
/// character and `\` escapes the next character.
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
                continue;
            }
            Some('?') => {
                p += 1;
                t += 1;
                continue;
            }
            Some('\\') if pattern.get(p + 1) == Some(&text[t]) => {
                p += 2;
                t += 1;
                continue;
            }
            Some(c) if *c != '\\' && *c == text[t] => {
                p += 1;
                t += 1;
                continue;
            }
            _ => {}
        }
        match backtrack {
            Some((star, matched)) => {
                p = star + 1;
                t = matched + 1;
                backtrack = Some((star, matched + 1));
            }
            None => return false,
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}
