//! Template-driven metadata extraction for Kubernetes object manifests.
//!
//! The heavy lifting lives in two workspace crates:
//!
//! - `discovery-jpath`: the path language used inside templates,
//! - `discovery-projector`: compiles templates and projects documents through them.
//!
//! This crate adds the manifest layer on top: reading template annotations,
//! attributing outputs to the objects they came from, and aggregating them
//! per owner.

pub mod cli;
pub mod error;
pub mod metadata;

pub use error::DiscoveryError;
pub use metadata::{ANNOTATION_PREFIX, Metadata, MetadataIndex, ObjectRef, extract_metadata};

pub use discovery_jpath as jpath;
pub use discovery_projector::{
    Field, FieldMode, Fragment, JPathResolver, MergeError, PathResolver, ProjectError, Projection,
    Projector, ProjectorBuilder, ProjectorConfig, Template, TemplateError, project,
};
