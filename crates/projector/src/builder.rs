use crate::config::ProjectorConfig;
use crate::error::TemplateError;
use crate::projector::Projector;
use crate::resolver::{JPathResolver, PathResolver};
use crate::template::Template;

/// A builder for creating a `Projector`.
pub struct ProjectorBuilder<R: PathResolver = JPathResolver> {
    template: Option<Template>,
    resolver: R,
    config: ProjectorConfig,
}

impl Default for ProjectorBuilder<JPathResolver> {
    fn default() -> Self {
        Self {
            template: None,
            resolver: JPathResolver,
            config: ProjectorConfig::default(),
        }
    }
}

impl ProjectorBuilder<JPathResolver> {
    /// Creates a new `ProjectorBuilder` using the JPath resolver and no output limit.
    pub fn new() -> Self {
        Default::default()
    }
}

impl<R: PathResolver> ProjectorBuilder<R> {
    /// Configures the projector with an already-parsed template.
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = Some(template);
        self
    }

    /// Configures the projector with a template from JSON text.
    pub fn with_template_source(mut self, source: &str) -> Result<Self, TemplateError> {
        self.template = Some(Template::parse(source)?);
        Ok(self)
    }

    /// Swaps the path language used to resolve template paths.
    pub fn with_resolver<S: PathResolver>(self, resolver: S) -> ProjectorBuilder<S> {
        ProjectorBuilder {
            template: self.template,
            resolver,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: ProjectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Caps the number of outputs a single projection may produce.
    pub fn with_max_outputs(mut self, limit: usize) -> Self {
        self.config.max_outputs = Some(limit);
        self
    }

    /// Consumes the builder and compiles every template path.
    pub fn build(self) -> Result<Projector<R>, TemplateError> {
        let template = self.template.ok_or(TemplateError::Missing)?;
        Projector::compile(&template, self.resolver, self.config)
    }
}
