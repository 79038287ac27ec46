use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JPathError {
    #[error("JPath parse error in '{0}': {1}")]
    JPathParse(String, String),

    #[error("Unknown modifier '@{0}'")]
    UnknownModifier(String),

    #[error("Empty path")]
    EmptyPath,
}
