pub mod fixtures;

use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Asserts two JSON texts are equal as values, ignoring key order and whitespace.
pub fn assert_json_eq(expected: &str, actual: &str) {
    let e: Value = serde_json::from_str(expected).expect("expected is valid JSON");
    let a: Value = serde_json::from_str(actual).expect("actual is valid JSON");
    assert_eq!(e, a, "\nexpected: {}\n  actual: {}", expected, actual);
}

/// Asserts two sets of JSON texts hold the same values, in any order.
pub fn assert_json_set_eq(expected: &[&str], actual: &[String]) {
    assert_eq!(expected.len(), actual.len(), "output count differs: {:?}", actual);
    let mut remaining: Vec<Value> = actual
        .iter()
        .map(|s| serde_json::from_str(s).expect("actual is valid JSON"))
        .collect();
    for text in expected {
        let e: Value = serde_json::from_str(text).expect("expected is valid JSON");
        let position = remaining
            .iter()
            .position(|a| *a == e)
            .unwrap_or_else(|| panic!("missing {} in {:?}", text, actual));
        remaining.remove(position);
    }
}
