//! The projection algorithm.
use crate::builder::ProjectorBuilder;
use crate::config::ProjectorConfig;
use crate::error::{ProjectError, TemplateError};
use crate::merge;
use crate::resolver::{JPathResolver, PathResolver};
use crate::template::{FieldMode, Template};
use itertools::Itertools;
use serde::Deserialize;
use serde_json::{Map, Value};

struct CompiledField<Q> {
    key: String,
    mode: FieldMode,
    query: Q,
}

/// A compiled template, ready to project any number of inputs.
///
/// A projector holds no mutable state; one instance may be shared across
/// threads and used concurrently.
pub struct Projector<R: PathResolver = JPathResolver> {
    fields: Vec<CompiledField<R::Query>>,
    resolver: R,
    config: ProjectorConfig,
}

impl Projector<JPathResolver> {
    /// Compiles `template` with the JPath resolver and no output limit.
    pub fn new(template: &Template) -> Result<Self, TemplateError> {
        Self::compile(template, JPathResolver, ProjectorConfig::default())
    }

    pub fn builder() -> ProjectorBuilder<JPathResolver> {
        ProjectorBuilder::new()
    }
}

impl<R: PathResolver> Projector<R> {
    /// Compiles every field path up front so a bad template fails here and
    /// never during projection.
    pub fn compile(template: &Template, resolver: R, config: ProjectorConfig) -> Result<Self, TemplateError> {
        let fields = template
            .fields()
            .iter()
            .map(|field| {
                let query = resolver.compile(&field.path).map_err(|e| TemplateError::Path {
                    key: field.key.clone(),
                    path: field.path.clone(),
                    source: Box::new(e),
                })?;
                Ok(CompiledField {
                    key: field.key.clone(),
                    mode: field.mode,
                    query,
                })
            })
            .collect::<Result<Vec<_>, TemplateError>>()?;
        Ok(Projector {
            fields,
            resolver,
            config,
        })
    }

    /// Projects a JSON text. Input that is not valid JSON yields
    /// `ProjectError::InvalidInput` and no outputs.
    pub fn project(&self, input: &str) -> Result<Projection, ProjectError> {
        let document = parse_document(input).map_err(ProjectError::InvalidInput)?;
        self.project_value(&document)
    }

    /// Projects an already-parsed document.
    pub fn project_value(&self, document: &Value) -> Result<Projection, ProjectError> {
        let mut outputs = vec![Map::new()];

        for field in &self.fields {
            let fetched = self.resolver.resolve(document, &field.query);
            let expand = field.mode == FieldMode::Expand && fetched.is_array();
            outputs = match fetched.into_value() {
                Value::Array(values) if expand => {
                    let requested = outputs.len().saturating_mul(values.len());
                    if let Some(limit) = self.config.exceeded_by(requested) {
                        return Err(ProjectError::OutputLimitExceeded {
                            key: field.key.clone(),
                            requested,
                            limit,
                            partial: to_texts(&outputs),
                        });
                    }
                    log::debug!(
                        "Expanding '{}' over {} values: {} -> {} outputs",
                        field.key,
                        values.len(),
                        outputs.len(),
                        requested
                    );
                    merge_product(&outputs, &field.key, &values)?
                }
                value => {
                    log::trace!("Setting '{}' on {} outputs", field.key, outputs.len());
                    merge_product(&outputs, &field.key, std::slice::from_ref(&value))?
                }
            };
        }

        Ok(Projection { outputs })
    }
}

/// Parses an input document. Nesting depth is not limited, so only
/// syntactically invalid text is rejected.
pub fn parse_document(input: &str) -> Result<Value, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_str(input);
    deserializer.disable_recursion_limit();
    let document = Value::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(document)
}

/// Writes every value into a copy of every output, outputs outermost, so the
/// values of later fields vary fastest. Failure leaves `outputs` as the
/// partial result.
fn merge_product(
    outputs: &[Map<String, Value>],
    key: &str,
    values: &[Value],
) -> Result<Vec<Map<String, Value>>, ProjectError> {
    let mut merged = Vec::with_capacity(outputs.len() * values.len());
    for (output, value) in outputs.iter().cartesian_product(values) {
        let mut next = output.clone();
        merge::set_path(&mut next, key, value.clone()).map_err(|source| ProjectError::MergeFailure {
            key: key.to_string(),
            source,
            partial: to_texts(outputs),
        })?;
        merged.push(next);
    }
    Ok(merged)
}

fn to_texts(outputs: &[Map<String, Value>]) -> Vec<String> {
    outputs
        .iter()
        .map(|output| Value::Object(output.clone()).to_string())
        .collect()
}

/// The ordered outputs of one projection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Projection {
    outputs: Vec<Map<String, Value>>,
}

impl Projection {
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// The outputs as JSON values.
    pub fn into_values(self) -> Vec<Value> {
        self.outputs.into_iter().map(Value::Object).collect()
    }

    /// The outputs as compact JSON object texts.
    pub fn into_texts(self) -> Vec<String> {
        to_texts(&self.outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MergeError;
    use crate::resolver::Fragment;
    use serde_json::json;

    const CRD: &str = r#"{"spec":{"group":"g","versions":[{"name":"v1beta1"},{"name":"v1"}],"names":{"kind":"K","plural":"ks"}}}"#;

    fn run(template: &str, input: &str) -> Result<Vec<String>, ProjectError> {
        let _ = env_logger::builder().is_test(true).try_init();
        let projector = Projector::new(&Template::parse(template).unwrap()).unwrap();
        Ok(projector.project(input)?.into_texts())
    }

    #[test]
    fn test_scalar_fields_give_one_output() {
        let outputs = run(r#"{"group": "spec.group", "kind": "spec.names.kind"}"#, CRD).unwrap();
        assert_eq!(outputs, vec![r#"{"group":"g","kind":"K"}"#]);
    }

    #[test]
    fn test_inline_keeps_array_verbatim() {
        let outputs = run(
            r#"{"group":"spec.group","versions":["spec.versions.#.name"],"kind":"spec.names.kind","plural":"spec.names.plural"}"#,
            CRD,
        )
        .unwrap();
        assert_eq!(
            outputs,
            vec![r#"{"group":"g","versions":["v1beta1","v1"],"kind":"K","plural":"ks"}"#]
        );
    }

    #[test]
    fn test_expand_gives_one_output_per_element() {
        let outputs = run(
            r#"{"group":"spec.group","version":"spec.versions.#.name","kind":"spec.names.kind","plural":"spec.names.plural"}"#,
            CRD,
        )
        .unwrap();
        assert_eq!(
            outputs,
            vec![
                r#"{"group":"g","version":"v1beta1","kind":"K","plural":"ks"}"#,
                r#"{"group":"g","version":"v1","kind":"K","plural":"ks"}"#,
            ]
        );
    }

    #[test]
    fn test_two_expansions_nest_in_field_order() {
        let input = r#"{"a": [1, 2], "b": ["x", "y", "z"]}"#;
        let outputs = run(r#"{"a": "a", "b": "b"}"#, input).unwrap();
        assert_eq!(
            outputs,
            vec![
                r#"{"a":1,"b":"x"}"#,
                r#"{"a":1,"b":"y"}"#,
                r#"{"a":1,"b":"z"}"#,
                r#"{"a":2,"b":"x"}"#,
                r#"{"a":2,"b":"y"}"#,
                r#"{"a":2,"b":"z"}"#,
            ]
        );

        let reversed = run(r#"{"b": "b", "a": "a"}"#, input).unwrap();
        assert_eq!(reversed.len(), 6);
        assert_eq!(reversed[0], r#"{"b":"x","a":1}"#);
        assert_eq!(reversed[1], r#"{"b":"x","a":2}"#);
    }

    #[test]
    fn test_empty_array_collapses_everything() {
        let input = r#"{"a": [1, 2], "none": [], "c": "z"}"#;
        assert!(run(r#"{"a": "a", "none": "none", "c": "c"}"#, input).unwrap().is_empty());
        assert!(run(r#"{"none": "none", "a": "a"}"#, input).unwrap().is_empty());
    }

    #[test]
    fn test_inline_empty_array_does_not_collapse() {
        let outputs = run(r#"{"none": ["none"]}"#, r#"{"none": []}"#).unwrap();
        assert_eq!(outputs, vec![r#"{"none":[]}"#]);
    }

    #[test]
    fn test_missing_path_sets_null() {
        let outputs = run(r#"{"group": "spec.group", "scope": "spec.scope"}"#, CRD).unwrap();
        assert_eq!(outputs, vec![r#"{"group":"g","scope":null}"#]);
    }

    #[test]
    fn test_nested_arrays_expand_only_top_level() {
        let outputs = run(r#"{"pair": "pairs"}"#, r#"{"pairs": [[1, 2], [3]]}"#).unwrap();
        assert_eq!(outputs, vec![r#"{"pair":[1,2]}"#, r#"{"pair":[3]}"#]);
    }

    #[test]
    fn test_object_values_are_embedded() {
        let outputs = run(r#"{"names": "spec.names"}"#, CRD).unwrap();
        assert_eq!(outputs, vec![r#"{"names":{"kind":"K","plural":"ks"}}"#]);
    }

    #[test]
    fn test_empty_template_gives_empty_object() {
        assert_eq!(run("{}", CRD).unwrap(), vec!["{}"]);
    }

    #[test]
    fn test_invalid_input_is_not_a_merge_failure() {
        let err = run(r#"{"group": "spec.group"}"#, "not json").unwrap_err();
        assert!(matches!(err, ProjectError::InvalidInput(_)));
        assert!(err.partial_outputs().is_empty());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_merge_failure_returns_partial_outputs() {
        let err = run(
            r#"{"meta": "spec.group", "version": "spec.versions.#.name", "app*": "spec.names.kind"}"#,
            CRD,
        )
        .unwrap_err();
        match &err {
            ProjectError::MergeFailure { key, source, partial } => {
                assert_eq!(key, "app*");
                assert_eq!(source, &MergeError::WildcardKey("app*".into()));
                assert_eq!(
                    partial,
                    &vec![
                        r#"{"meta":"g","version":"v1beta1"}"#.to_string(),
                        r#"{"meta":"g","version":"v1"}"#.to_string(),
                    ]
                );
            }
            other => panic!("expected merge failure, got {:?}", other),
        }
    }

    #[test]
    fn test_dotted_key_replaces_scalar_intermediate() {
        let outputs = run(r#"{"meta": "spec.group", "meta.kind": "spec.names.kind"}"#, CRD).unwrap();
        assert_eq!(outputs, vec![r#"{"meta":{"kind":"K"}}"#]);
    }

    #[test]
    fn test_numbers_are_copied_verbatim() {
        let outputs = run(
            r#"{"n":"n","e":"e","big":"big","f":"f"}"#,
            r#"{"n":12345678901234567890123,"e":1e2,"big":18446744073709551616,"f":0.10}"#,
        )
        .unwrap();
        assert_eq!(
            outputs,
            vec![r#"{"n":12345678901234567890123,"e":1e2,"big":18446744073709551616,"f":0.10}"#]
        );
    }

    #[test]
    fn test_deeply_nested_input_is_valid() {
        let depth = 200;
        let input = format!(r#"{{"d":{}1{},"name":"deep"}}"#, "[".repeat(depth), "]".repeat(depth));
        let outputs = run(r#"{"name": "name", "count": "d.#"}"#, &input).unwrap();
        assert_eq!(outputs, vec![r#"{"name":"deep","count":1}"#]);
    }

    #[test]
    fn test_trailing_garbage_is_invalid_input() {
        let err = run(r#"{"a": "a"}"#, r#"{"a": 1} {"#).unwrap_err();
        assert!(matches!(err, ProjectError::InvalidInput(_)));
    }

    #[test]
    fn test_output_limit() {
        let template = Template::parse(r#"{"a": "a", "b": "b"}"#).unwrap();
        let projector = Projector::builder()
            .with_template(template)
            .with_max_outputs(4)
            .build()
            .unwrap();
        let err = projector
            .project(r#"{"a": [1, 2], "b": [1, 2, 3]}"#)
            .unwrap_err();
        match err {
            ProjectError::OutputLimitExceeded {
                key,
                requested,
                limit,
                partial,
            } => {
                assert_eq!(key, "b");
                assert_eq!(requested, 6);
                assert_eq!(limit, 4);
                assert_eq!(partial, vec![r#"{"a":1}"#, r#"{"a":2}"#]);
            }
            other => panic!("expected limit error, got {:?}", other),
        }
        assert_eq!(projector.project(r#"{"a": [1, 2], "b": [1, 2]}"#).unwrap().len(), 4);
    }

    #[test]
    fn test_bad_path_fails_at_compile_time() {
        let template = Template::parse(r#"{"group": "spec..group"}"#).unwrap();
        let err = Projector::new(&template).err().unwrap();
        assert!(matches!(err, TemplateError::Path { ref key, .. } if key == "group"));
    }

    #[test]
    fn test_builder_requires_template() {
        assert!(matches!(
            Projector::builder().build().err(),
            Some(TemplateError::Missing)
        ));
    }

    #[test]
    fn test_repeated_projection_is_identical() {
        let template = Template::parse(r#"{"a": "a", "b": "b", "c": ["c"]}"#).unwrap();
        let projector = Projector::new(&template).unwrap();
        let input = json!({ "a": [3, 1, 2], "b": { "z": 1, "y": 2 }, "c": [9, 8] });
        let first = projector.project_value(&input).unwrap();
        for _ in 0..10 {
            assert_eq!(projector.project_value(&input).unwrap(), first);
        }
    }

    #[test]
    fn test_projector_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Projector>();
    }

    /// Resolves RFC 6901 JSON pointers, to exercise a non-default path language.
    struct PointerResolver;

    #[derive(Debug, thiserror::Error)]
    #[error("pointer must start with '/'")]
    struct PointerError;

    impl PathResolver for PointerResolver {
        type Query = String;
        type Error = PointerError;

        fn compile(&self, path: &str) -> Result<String, PointerError> {
            if path.starts_with('/') {
                Ok(path.to_string())
            } else {
                Err(PointerError)
            }
        }

        fn resolve(&self, document: &Value, query: &String) -> Fragment {
            match document.pointer(query) {
                Some(value) => Fragment::new(value.clone()),
                None => Fragment::missing(),
            }
        }
    }

    #[test]
    fn test_custom_resolver() {
        let projector = ProjectorBuilder::new()
            .with_template_source(
                r#"{"kind": "/spec/names/kind", "version": "/spec/versions/1/name", "scope": "/spec/scope"}"#,
            )
            .unwrap()
            .with_resolver(PointerResolver)
            .build()
            .unwrap();
        let outputs = projector.project(CRD).unwrap().into_texts();
        assert_eq!(outputs, vec![r#"{"kind":"K","version":"v1","scope":null}"#]);

        let bad = ProjectorBuilder::new()
            .with_template_source(r#"{"kind": "spec.names.kind"}"#)
            .unwrap()
            .with_resolver(PointerResolver)
            .build();
        assert!(matches!(bad.err(), Some(TemplateError::Path { .. })));
    }
}
