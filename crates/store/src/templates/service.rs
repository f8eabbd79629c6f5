//! Template service for CRUD operations on templates

use super::{EditingSession, TemplateError, TemplateResult, TemplateStore};
use crate::{AppSettings, EditingSettings};
use chrono::Utc;
use inspection_model::{
    InspectionItem, InspectionSection, InspectionTemplate, ItemDraft, ItemId, SectionDraft,
    SectionId, TemplateDraft, TemplateId, TemplatePatch, TemplateType,
};
use std::collections::HashSet;

/// CRUD over a [`TemplateStore`], enforcing template invariants.
///
/// Every successful operation leaves each template with a non-blank name, at
/// least one section, and at least one item per section. Mutations are
/// applied in call order; two commits of the same template resolve to the
/// last one, with no merge.
#[derive(Debug)]
pub struct TemplateService {
    store: TemplateStore,
    copy_suffix: String,
    editing: EditingSettings,
}

impl TemplateService {
    /// Create a service over the given store with default settings
    pub fn new(store: TemplateStore) -> Self {
        let defaults = AppSettings::default();
        Self {
            store,
            copy_suffix: defaults.templates.copy_suffix,
            editing: defaults.editing,
        }
    }

    /// Create a service and its store from application settings
    pub fn from_settings(settings: &AppSettings) -> Self {
        let store = if settings.templates.seed_defaults {
            TemplateStore::seeded()
        } else {
            TemplateStore::new()
        };
        Self {
            store,
            copy_suffix: settings.templates.copy_suffix.clone(),
            editing: settings.editing.clone(),
        }
    }

    /// Get the underlying store
    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Consume the service, returning its store
    pub fn into_store(self) -> TemplateStore {
        self.store
    }

    /// Restore the store to its initial state
    pub fn reset(&mut self) {
        self.store.reset();
        tracing::info!("Template store reset ({} templates)", self.store.len());
    }

    /// Snapshot of all templates in creation order
    pub fn list(&self) -> Vec<InspectionTemplate> {
        self.store.all().to_vec()
    }

    /// Get a template by ID
    pub fn get(&self, id: &TemplateId) -> TemplateResult<&InspectionTemplate> {
        self.store
            .get(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// Create a template from a draft.
    ///
    /// Fresh IDs are assigned to the template and all of its sections and
    /// items. The result is never a default template.
    pub fn create(&mut self, draft: TemplateDraft) -> TemplateResult<InspectionTemplate> {
        validate_name(&draft.name)?;
        if draft.sections.is_empty() {
            return Err(TemplateError::Validation(
                "template must have at least one section".to_string(),
            ));
        }
        for section in &draft.sections {
            if section.items.is_empty() {
                return Err(TemplateError::Validation(format!(
                    "section '{}' must have at least one item",
                    section.name
                )));
            }
        }
        if draft.is_default {
            tracing::debug!("Ignoring default flag on new template '{}'", draft.name);
        }

        let now = Utc::now();
        let template = InspectionTemplate {
            id: TemplateId::generate(),
            name: draft.name,
            description: draft.description,
            template_type: draft.template_type,
            sections: draft.sections.into_iter().map(instantiate_section).collect(),
            created_at: now,
            updated_at: now,
            is_default: false,
        };

        self.store.insert(template.clone())?;
        tracing::info!("Created template {} '{}'", template.id, template.name);
        Ok(template)
    }

    /// Apply a field-level patch to a stored template.
    ///
    /// The merged record is validated before anything is written; on failure
    /// the store is unchanged.
    pub fn update(
        &mut self,
        id: &TemplateId,
        patch: TemplatePatch,
    ) -> TemplateResult<InspectionTemplate> {
        let existing = self.get(id)?;

        if existing.is_default {
            if let Some(new_type) = patch.template_type {
                if new_type != existing.template_type {
                    tracing::warn!("Rejected type change on default template {}", id);
                    return Err(TemplateError::ProtectedRecord(format!(
                        "type of default template {} cannot change",
                        id
                    )));
                }
            }
        }

        let mut updated = existing.clone();
        patch.apply_to(&mut updated);
        validate_template(&updated)?;
        updated.updated_at = Utc::now();

        self.store.replace(updated.clone())?;
        tracing::info!("Updated template {} '{}'", updated.id, updated.name);
        Ok(updated)
    }

    /// Delete a template. Default templates cannot be deleted.
    pub fn delete(&mut self, id: &TemplateId) -> TemplateResult<()> {
        if self.get(id)?.is_default {
            tracing::warn!("Rejected deletion of default template {}", id);
            return Err(TemplateError::ProtectedRecord(format!(
                "default template {} cannot be deleted",
                id
            )));
        }

        self.store.remove(id)?;
        tracing::info!("Deleted template {}", id);
        Ok(())
    }

    /// Create a non-default copy of a template with fresh section and item IDs
    pub fn duplicate(&mut self, id: &TemplateId) -> TemplateResult<InspectionTemplate> {
        let source = self.get(id)?;
        let mut draft = TemplateDraft::from_template(source);
        draft.name = format!("{}{}", source.name, self.copy_suffix);
        draft.is_default = false;

        let copy = self.create(draft)?;
        tracing::debug!("Duplicated template {} as {}", id, copy.id);
        Ok(copy)
    }

    /// Search templates by name or description (case-insensitive)
    pub fn search(&self, query: &str) -> Vec<&InspectionTemplate> {
        let query_lower = query.to_lowercase();

        self.store
            .all()
            .iter()
            .filter(|t| {
                t.name.to_lowercase().contains(&query_lower)
                    || t.description.to_lowercase().contains(&query_lower)
            })
            .collect()
    }

    /// Filter templates by type
    pub fn filter_by_type(&self, template_type: TemplateType) -> Vec<&InspectionTemplate> {
        self.store
            .all()
            .iter()
            .filter(|t| t.template_type == template_type)
            .collect()
    }

    /// Start an editing session on a copy of the template
    pub fn begin_edit(&self, id: &TemplateId) -> TemplateResult<EditingSession> {
        let template = self.get(id)?;
        Ok(EditingSession::begin_with(template, self.editing.clone()))
    }
}

fn instantiate_section(draft: SectionDraft) -> InspectionSection {
    InspectionSection {
        id: SectionId::generate(),
        name: draft.name,
        is_expanded: draft.is_expanded,
        items: draft.items.into_iter().map(instantiate_item).collect(),
    }
}

fn instantiate_item(draft: ItemDraft) -> InspectionItem {
    InspectionItem {
        id: ItemId::generate(),
        name: draft.name,
        description: draft.description,
        required: draft.required,
    }
}

pub(crate) fn validate_name(name: &str) -> TemplateResult<()> {
    if name.trim().is_empty() {
        return Err(TemplateError::Validation(
            "template name cannot be blank".to_string(),
        ));
    }
    Ok(())
}

/// Check the structural invariants of a complete template
fn validate_template(template: &InspectionTemplate) -> TemplateResult<()> {
    validate_name(&template.name)?;

    if template.sections.is_empty() {
        return Err(TemplateError::Validation(
            "template must have at least one section".to_string(),
        ));
    }

    let mut section_ids = HashSet::new();
    for section in &template.sections {
        if !section_ids.insert(&section.id) {
            return Err(TemplateError::Validation(format!(
                "duplicate section id {}",
                section.id
            )));
        }
        if section.items.is_empty() {
            return Err(TemplateError::Validation(format!(
                "section '{}' must have at least one item",
                section.name
            )));
        }

        let mut item_ids = HashSet::new();
        for item in &section.items {
            if !item_ids.insert(&item.id) {
                return Err(TemplateError::Validation(format!(
                    "duplicate item id {} in section '{}'",
                    item.id, section.name
                )));
            }
        }
    }

    Ok(())
}
