//! Defines the Abstract Syntax Tree (AST) for JPath expressions.
use serde_json::Value;

/// A parsed path: the sequence of segments applied left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub segments: Vec<PathSegment>,
}

/// Represents a segment in a JPath selection.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// An object key (e.g., `name`). Numeric keys also index arrays.
    Key(String),
    /// An object key containing `*` or `?` wildcards.
    Pattern(String),
    /// The `#` operator: array length when last, projection otherwise.
    Hash,
    /// A `#(...)` query over array elements. `all` is set for the `#(...)#` form.
    Query { predicate: Predicate, all: bool },
    /// A named `@modifier` applied to the current value.
    Modifier(String),
}

/// A comparison applied to each element by a `#(...)` query.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Path inside the element. Empty means the element itself.
    pub field: Vec<PathSegment>,
    pub op: CompareOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Wildcard match against a string value.
    Like,
}
