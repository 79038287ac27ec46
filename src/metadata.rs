//! Metadata extraction from annotated manifests.
//!
//! An object opts in by carrying annotations named `<prefix><type id>` whose
//! values are projection templates. Every output of a template becomes one
//! `Metadata` entry for that type id, referencing the object it came from.
use crate::error::DiscoveryError;
use discovery_projector::{ProjectorBuilder, ProjectorConfig, Template};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The annotation prefix that marks a metadata template.
pub const ANNOTATION_PREFIX: &str = "discovery.addons.x-k8s.io/";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    #[serde(default)]
    api_version: String,
    kind: String,
    metadata: ManifestMeta,
}

#[derive(Deserialize)]
struct ManifestMeta {
    name: String,
    namespace: Option<String>,
    uid: Option<String>,
    #[serde(default)]
    annotations: BTreeMap<String, String>,
}

/// Identity of a manifest, displayed as `kind/namespace/name` (or
/// `kind/name` for cluster-scoped objects).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub api_version: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl ObjectRef {
    pub fn from_manifest(object: &Value) -> Result<Self, DiscoveryError> {
        Ok(parse_manifest(object)?.object_ref())
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{}/{}/{}", self.kind, namespace, self.name),
            None => write!(f, "{}/{}", self.kind, self.name),
        }
    }
}

impl Manifest {
    fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            api_version: self.api_version.clone(),
            kind: self.kind.clone(),
            namespace: self.metadata.namespace.clone(),
            name: self.metadata.name.clone(),
            uid: self.metadata.uid.clone(),
        }
    }

    /// `(annotation, type id, template)` for every annotation under `prefix`.
    fn templates<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str, &'a str)> {
        self.metadata
            .annotations
            .iter()
            .filter_map(move |(annotation, template)| {
                let type_id = annotation.strip_prefix(prefix)?;
                (!type_id.is_empty()).then_some((annotation.as_str(), type_id, template.as_str()))
            })
    }
}

fn parse_manifest(object: &Value) -> Result<Manifest, DiscoveryError> {
    Manifest::deserialize(object).map_err(|e| DiscoveryError::Manifest(e.to_string()))
}

/// One extracted metadata entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "type")]
    pub type_id: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub content: Value,
}

fn project_template(template: &str, object: &Value, config: ProjectorConfig) -> Result<Vec<Value>, DiscoveryError> {
    let projector = ProjectorBuilder::new()
        .with_template(Template::parse(template)?)
        .with_config(config)
        .build()?;
    Ok(projector.project_value(object)?.into_values())
}

/// Applies every template annotation of `object` to the object itself.
/// Fails on the first annotation whose template or projection fails.
pub fn extract_metadata(object: &Value, prefix: &str, config: ProjectorConfig) -> Result<Vec<Metadata>, DiscoveryError> {
    let manifest = parse_manifest(object)?;
    let reference = manifest.object_ref().to_string();
    let mut entries = Vec::new();

    for (annotation, type_id, template) in manifest.templates(prefix) {
        let outputs = project_template(template, object, config).map_err(|e| DiscoveryError::Annotation {
            annotation: annotation.to_string(),
            source: Box::new(e),
        })?;
        log::debug!("{} produced {} '{}' entries", reference, outputs.len(), type_id);
        entries.extend(outputs.into_iter().map(|content| Metadata {
            type_id: type_id.to_string(),
            reference: reference.clone(),
            content,
        }));
    }
    Ok(entries)
}

/// Metadata collected for one owner, keyed by (type id, object reference).
///
/// Recording an object again replaces everything previously recorded for it,
/// so the index always reflects the latest version of each object.
#[derive(Debug, Clone)]
pub struct MetadataIndex {
    prefix: String,
    config: ProjectorConfig,
    entries: BTreeMap<(String, String), Vec<Value>>,
}

impl Default for MetadataIndex {
    fn default() -> Self {
        Self {
            prefix: ANNOTATION_PREFIX.to_string(),
            config: ProjectorConfig::default(),
            entries: BTreeMap::new(),
        }
    }
}

impl MetadataIndex {
    pub fn new() -> Self {
        Default::default()
    }

    /// Uses a different annotation prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_config(mut self, config: ProjectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Records the metadata of `object` and returns how many entries it produced.
    ///
    /// An annotation whose template is broken, or whose projection fails, is
    /// logged and skipped; the object's other annotations are still recorded.
    pub fn record(&mut self, object: &Value) -> Result<usize, DiscoveryError> {
        let manifest = parse_manifest(object)?;
        let reference = manifest.object_ref().to_string();
        self.remove(&reference);

        let mut recorded = 0;
        for (annotation, type_id, template) in manifest.templates(&self.prefix) {
            match project_template(template, object, self.config) {
                Ok(outputs) => {
                    recorded += outputs.len();
                    self.entries
                        .entry((type_id.to_string(), reference.clone()))
                        .or_default()
                        .extend(outputs);
                }
                Err(e) => log::warn!("Skipping annotation '{}' on {}: {}", annotation, reference, e),
            }
        }
        Ok(recorded)
    }

    /// Drops every entry recorded for `reference`, returning how many were removed.
    pub fn remove(&mut self, reference: &str) -> usize {
        let mut removed = 0;
        self.entries.retain(|(_, r), contents| {
            if r == reference {
                removed += contents.len();
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn get(&self, type_id: &str, reference: &str) -> Option<&[Value]> {
        self.entries
            .get(&(type_id.to_string(), reference.to_string()))
            .map(Vec::as_slice)
    }

    /// All entries, ordered by type id, then reference, then projection order.
    pub fn entries(&self) -> Vec<Metadata> {
        self.entries
            .iter()
            .flat_map(|((type_id, reference), contents)| {
                contents.iter().map(move |content| Metadata {
                    type_id: type_id.clone(),
                    reference: reference.clone(),
                    content: content.clone(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }
}
