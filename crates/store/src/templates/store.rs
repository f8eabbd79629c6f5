//! In-memory template store

use super::{default_templates, TemplateError, TemplateResult};
use inspection_model::{InspectionTemplate, TemplateId};

/// Owns the authoritative collection of templates.
///
/// Templates are kept in creation order. A store is a plain value handed to
/// the service, so every test can start from its own seeded instance.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: Vec<InspectionTemplate>,
    seeded: bool,
}

impl TemplateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
            seeded: false,
        }
    }

    /// Create a store holding the built-in default templates
    pub fn seeded() -> Self {
        Self {
            templates: default_templates(),
            seeded: true,
        }
    }

    /// Restore the store to its initial state (seeded defaults, or empty)
    pub fn reset(&mut self) {
        self.templates = if self.seeded {
            default_templates()
        } else {
            Vec::new()
        };
    }

    /// All templates in creation order
    pub fn all(&self) -> &[InspectionTemplate] {
        &self.templates
    }

    /// Get a template by ID
    pub fn get(&self, id: &TemplateId) -> Option<&InspectionTemplate> {
        self.templates.iter().find(|t| &t.id == id)
    }

    /// Check if a template exists
    pub fn contains(&self, id: &TemplateId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Append a template
    pub fn insert(&mut self, template: InspectionTemplate) -> TemplateResult<()> {
        if self.contains(&template.id) {
            return Err(TemplateError::Validation(format!(
                "duplicate template id {}",
                template.id
            )));
        }
        self.templates.push(template);
        Ok(())
    }

    /// Replace the template with the same ID, keeping its position
    pub fn replace(&mut self, template: InspectionTemplate) -> TemplateResult<()> {
        let slot = self
            .templates
            .iter_mut()
            .find(|t| t.id == template.id)
            .ok_or_else(|| TemplateError::NotFound(template.id.to_string()))?;
        *slot = template;
        Ok(())
    }

    /// Remove a template by ID
    pub fn remove(&mut self, id: &TemplateId) -> TemplateResult<InspectionTemplate> {
        let pos = self
            .templates
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;
        Ok(self.templates.remove(pos))
    }
}
