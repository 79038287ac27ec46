// src/error.rs
use discovery_projector::{ProjectError, TemplateError};
use thiserror::Error;

/// A comprehensive error type for metadata extraction and the command line.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Template is invalid: {0}")]
    Template(#[from] TemplateError),

    #[error("Projection failed: {0}")]
    Project(#[from] ProjectError),

    #[error("Manifest is invalid: {0}")]
    Manifest(String),

    #[error("Annotation '{annotation}' failed: {source}")]
    Annotation {
        annotation: String,
        source: Box<DiscoveryError>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
