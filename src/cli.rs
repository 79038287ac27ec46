//! The `discovery` command line.
use crate::error::DiscoveryError;
use crate::metadata::{ANNOTATION_PREFIX, extract_metadata};
use clap::{Parser, Subcommand};
use discovery_projector::{ProjectError, Projector, ProjectorConfig, Template, parse_document};
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};

/// Extract structured metadata from JSON documents with path templates.
#[derive(Parser, Debug)]
#[command(name = "discovery", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project a document through a template, printing one JSON object per line.
    Project {
        /// Template as inline JSON (starting with `{`) or a path to a file.
        #[arg(short, long)]
        template: String,
        /// Input document path, or `-` for stdin.
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Abort when a projection would produce more outputs than this.
        #[arg(long)]
        max_outputs: Option<usize>,
        /// Pretty-print each output.
        #[arg(long)]
        pretty: bool,
    },
    /// Apply the template annotations of a manifest (or a `List` of manifests).
    Extract {
        /// Manifest path, or `-` for stdin.
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Annotation prefix marking metadata templates.
        #[arg(long, default_value = ANNOTATION_PREFIX)]
        prefix: String,
        #[arg(long)]
        max_outputs: Option<usize>,
    },
}

fn read_source(source: &str) -> Result<String, DiscoveryError> {
    if source == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    fs::read_to_string(source).map_err(|e| {
        DiscoveryError::Io(io::Error::new(
            e.kind(),
            format!("Failed to read '{}': {}", source, e),
        ))
    })
}

fn config(max_outputs: Option<usize>) -> ProjectorConfig {
    ProjectorConfig { max_outputs }
}

/// Runs a parsed command, writing results to `out`.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> Result<(), DiscoveryError> {
    match cli.command {
        Command::Project {
            template,
            input,
            max_outputs,
            pretty,
        } => {
            let template_source = if template.trim_start().starts_with('{') {
                template
            } else {
                read_source(&template)?
            };
            let template = Template::parse(&template_source)?;
            log::info!("Compiling template with {} fields", template.len());
            let projector = Projector::builder()
                .with_template(template)
                .with_config(config(max_outputs))
                .build()?;

            let input = read_source(&input)?;
            match projector.project(&input) {
                Ok(projection) => {
                    for output in projection.into_values() {
                        write_value(out, &output, pretty)?;
                    }
                    Ok(())
                }
                Err(e) => {
                    write_partial(out, &e, pretty)?;
                    Err(e.into())
                }
            }
        }
        Command::Extract {
            input,
            prefix,
            max_outputs,
        } => {
            let document = parse_document(&read_source(&input)?)?;
            for object in manifests(&document) {
                for entry in extract_metadata(object, &prefix, config(max_outputs))? {
                    writeln!(out, "{}", serde_json::to_string(&entry)?)?;
                }
            }
            Ok(())
        }
    }
}

/// The items of a `*List` document, or the document itself.
fn manifests(document: &Value) -> Vec<&Value> {
    let is_list = document
        .get("kind")
        .and_then(Value::as_str)
        .is_some_and(|kind| kind.ends_with("List"));
    match document.get("items").and_then(Value::as_array) {
        Some(items) if is_list => items.iter().collect(),
        _ => vec![document],
    }
}

fn write_value<W: Write>(out: &mut W, value: &Value, pretty: bool) -> Result<(), DiscoveryError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(out, "{}", text)?;
    Ok(())
}

fn write_partial<W: Write>(out: &mut W, error: &ProjectError, pretty: bool) -> Result<(), DiscoveryError> {
    let partial = error.partial_outputs();
    if !partial.is_empty() {
        log::warn!("Writing {} partial outputs before failing", partial.len());
    }
    for text in partial {
        let value = parse_document(text)?;
        write_value(out, &value, pretty)?;
    }
    Ok(())
}
