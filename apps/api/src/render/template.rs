use std::sync::Arc;

use handlebars::Handlebars;

use crate::errors::AppError;
use crate::prepare::GroupedEntries;

const TEMPLATE_NAME: &str = "resume";
const RESUME_TEMPLATE: &str = include_str!("../../templates/resume.hbs");

/// Renders Grouped Entries through the built-in résumé template.
///
/// Sections bind to `bio.[0]` for the header and social links, and iterate
/// `employment`, `education`, `projects` and `skills` in the order given.
#[derive(Clone)]
pub struct TemplateRenderer {
    registry: Arc<Handlebars<'static>>,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self, AppError> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(TEMPLATE_NAME, RESUME_TEMPLATE)
            .map_err(|e| AppError::Render(format!("Invalid résumé template: {e}")))?;
        Ok(Self {
            registry: Arc::new(registry),
        })
    }

    pub fn render(&self, entries: &GroupedEntries) -> Result<String, AppError> {
        self.registry
            .render(TEMPLATE_NAME, entries)
            .map_err(|e| AppError::Render(format!("Template rendering failed: {e}")))
    }
}
