//! Template projection over JSON documents.
//!
//! A template is a JSON object whose values are paths into an input document.
//! Projecting an input resolves every path and writes the result under the
//! field's key. A path that resolves to an array fans the output out into one
//! object per element, so several array fields produce their cartesian
//! product. Wrapping a path in a one-element array (`["spec.versions.#.name"]`)
//! embeds the array as a single value instead.
//!
//! ```
//! let outputs = discovery_projector::project(
//!     r#"{"group": "spec.group", "version": "spec.versions.#.name"}"#,
//!     r#"{"spec": {"group": "g", "versions": [{"name": "v1beta1"}, {"name": "v1"}]}}"#,
//! ).unwrap();
//! assert_eq!(outputs, vec![
//!     r#"{"group":"g","version":"v1beta1"}"#.to_string(),
//!     r#"{"group":"g","version":"v1"}"#.to_string(),
//! ]);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod merge;
pub mod projector;
pub mod resolver;
pub mod template;

pub use builder::ProjectorBuilder;
pub use config::ProjectorConfig;
pub use error::{MergeError, ProjectError, TemplateError};
pub use projector::{Projection, Projector, parse_document};
pub use resolver::{Fragment, JPathResolver, PathResolver};
pub use template::{Field, FieldMode, Template};

/// Compiles `template` and projects `input` through it, returning one JSON
/// object text per output.
pub fn project(template: &str, input: &str) -> Result<Vec<String>, ProjectError> {
    let template = Template::parse(template)?;
    let projector = Projector::new(&template)?;
    Ok(projector.project(input)?.into_texts())
}
