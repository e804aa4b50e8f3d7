//! Renderer holding its templates in memory.

use std::collections::BTreeMap;

use pylon_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::RenderContext,
    error::PylonResult,
};

use super::syntax;

/// Same syntax as [`super::DirectoryRenderer`]; every stored template is part
/// of the catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRenderer {
    templates: BTreeMap<String, String>,
}

impl InMemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(name.into(), source.into());
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn load(&self, name: &str) -> PylonResult<String> {
        self.templates.get(name).cloned().ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }
}

impl TemplateRenderer for InMemoryRenderer {
    fn templates(&self) -> PylonResult<Vec<String>> {
        Ok(self.templates.keys().cloned().collect())
    }

    fn render(&self, name: &str, context: &RenderContext) -> PylonResult<String> {
        syntax::render(name, context, &|n: &str| self.load(n))
    }
}
