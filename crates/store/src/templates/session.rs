//! Editing sessions - staged edits on a private copy of a template

use super::service::validate_name;
use super::{TemplateError, TemplateResult, TemplateService};
use crate::EditingSettings;
use inspection_model::{
    InspectionItem, InspectionSection, InspectionTemplate, ItemId, SectionId, TemplatePatch,
    TemplateType,
};

/// Lifecycle of an editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting edits
    Editing,
    /// Saved back to the store
    Committed,
    /// Abandoned without saving
    Discarded,
}

/// Top-level template fields an editor may change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateField {
    Name(String),
    Description(String),
    Type(TemplateType),
}

/// Section fields an editor may change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionField {
    Name(String),
    Expanded(bool),
}

/// Item fields an editor may change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemField {
    Name(String),
    Description(String),
    Required(bool),
}

/// A working copy of one template, scoped to a single edit interaction.
///
/// The session owns its copy; nothing reaches the store until [`commit`].
/// Once committed or discarded, every further call fails with
/// [`TemplateError::SessionClosed`].
///
/// [`commit`]: EditingSession::commit
#[derive(Debug, Clone)]
pub struct EditingSession {
    original: InspectionTemplate,
    working: InspectionTemplate,
    state: SessionState,
    settings: EditingSettings,
}

impl EditingSession {
    /// Begin editing a copy of the template
    pub fn begin(template: &InspectionTemplate) -> Self {
        Self::begin_with(template, EditingSettings::default())
    }

    /// Begin editing with custom placeholder names
    pub fn begin_with(template: &InspectionTemplate, settings: EditingSettings) -> Self {
        tracing::debug!("Editing session started for template {}", template.id);
        Self {
            original: template.clone(),
            working: template.clone(),
            state: SessionState::Editing,
            settings,
        }
    }

    /// The current working copy
    pub fn template(&self) -> &InspectionTemplate {
        &self.working
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the working copy differs from the template the session began with
    pub fn is_dirty(&self) -> bool {
        self.working != self.original
    }

    fn ensure_open(&self) -> TemplateResult<()> {
        match self.state {
            SessionState::Editing => Ok(()),
            SessionState::Committed | SessionState::Discarded => Err(TemplateError::SessionClosed),
        }
    }

    fn section_mut(&mut self, section_id: &SectionId) -> TemplateResult<&mut InspectionSection> {
        self.working
            .section_mut(section_id)
            .ok_or_else(|| TemplateError::NotFound(format!("section {}", section_id)))
    }

    fn placeholder_item(&self) -> InspectionItem {
        InspectionItem::new(ItemId::generate(), self.settings.new_item_name.clone())
    }

    /// Set a top-level field. Values are validated on commit.
    pub fn set_field(&mut self, field: TemplateField) -> TemplateResult<()> {
        self.ensure_open()?;
        match field {
            TemplateField::Name(name) => self.working.name = name,
            TemplateField::Description(description) => self.working.description = description,
            TemplateField::Type(template_type) => {
                if self.working.is_default && template_type != self.working.template_type {
                    return Err(TemplateError::ProtectedRecord(format!(
                        "type of default template {} cannot change",
                        self.working.id
                    )));
                }
                self.working.template_type = template_type;
            }
        }
        Ok(())
    }

    /// Append a new section holding one placeholder item
    pub fn add_section(&mut self) -> TemplateResult<SectionId> {
        self.ensure_open()?;
        let section = InspectionSection::new(
            SectionId::generate(),
            self.settings.new_section_name.clone(),
            vec![self.placeholder_item()],
        );
        let id = section.id.clone();
        self.working.sections.push(section);
        Ok(id)
    }

    /// Change one field of a section
    pub fn update_section(
        &mut self,
        section_id: &SectionId,
        field: SectionField,
    ) -> TemplateResult<()> {
        self.ensure_open()?;
        let section = self.section_mut(section_id)?;
        match field {
            SectionField::Name(name) => section.name = name,
            SectionField::Expanded(expanded) => section.is_expanded = expanded,
        }
        Ok(())
    }

    /// Flip a section between expanded and collapsed
    pub fn toggle_section(&mut self, section_id: &SectionId) -> TemplateResult<bool> {
        self.ensure_open()?;
        let section = self.section_mut(section_id)?;
        section.is_expanded = !section.is_expanded;
        Ok(section.is_expanded)
    }

    /// Remove a section. The last remaining section cannot be removed.
    pub fn delete_section(&mut self, section_id: &SectionId) -> TemplateResult<()> {
        self.ensure_open()?;
        let pos = self
            .working
            .sections
            .iter()
            .position(|s| &s.id == section_id)
            .ok_or_else(|| TemplateError::NotFound(format!("section {}", section_id)))?;

        if self.working.sections.len() == 1 {
            return Err(TemplateError::MinimumViolation("section".to_string()));
        }

        self.working.sections.remove(pos);
        Ok(())
    }

    /// Append a placeholder item to a section
    pub fn add_item(&mut self, section_id: &SectionId) -> TemplateResult<ItemId> {
        self.ensure_open()?;
        let item = self.placeholder_item();
        let id = item.id.clone();
        self.section_mut(section_id)?.items.push(item);
        Ok(id)
    }

    /// Change one field of an item
    pub fn update_item(
        &mut self,
        section_id: &SectionId,
        item_id: &ItemId,
        field: ItemField,
    ) -> TemplateResult<()> {
        self.ensure_open()?;
        let item = self
            .section_mut(section_id)?
            .item_mut(item_id)
            .ok_or_else(|| TemplateError::NotFound(format!("item {}", item_id)))?;
        match field {
            ItemField::Name(name) => item.name = name,
            ItemField::Description(description) => item.description = description,
            ItemField::Required(required) => item.required = required,
        }
        Ok(())
    }

    /// Remove an item. The last item in a section cannot be removed.
    pub fn delete_item(&mut self, section_id: &SectionId, item_id: &ItemId) -> TemplateResult<()> {
        self.ensure_open()?;
        let section = self.section_mut(section_id)?;
        let pos = section
            .items
            .iter()
            .position(|i| &i.id == item_id)
            .ok_or_else(|| TemplateError::NotFound(format!("item {}", item_id)))?;

        if section.items.len() == 1 {
            return Err(TemplateError::MinimumViolation(format!(
                "item in section '{}'",
                section.name
            )));
        }

        section.items.remove(pos);
        Ok(())
    }

    /// Save the working copy back through the service.
    ///
    /// Returns the stored record with its new `updated_at`. If validation
    /// fails the session stays open so the caller can correct it.
    pub fn commit(&mut self, service: &mut TemplateService) -> TemplateResult<InspectionTemplate> {
        self.ensure_open()?;
        validate_name(&self.working.name)?;

        let saved = service.update(&self.working.id, TemplatePatch::replace_with(&self.working))?;
        self.state = SessionState::Committed;
        tracing::debug!("Editing session committed for template {}", saved.id);
        Ok(saved)
    }

    /// Abandon the working copy. The store is not touched.
    pub fn discard(&mut self) -> TemplateResult<()> {
        self.ensure_open()?;
        self.working = self.original.clone();
        self.state = SessionState::Discarded;
        tracing::debug!("Editing session discarded for template {}", self.working.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TemplateStore;
    use inspection_model::{ItemDraft, SectionDraft, TemplateDraft, TemplateId};

    fn single_item_service() -> (TemplateService, InspectionTemplate) {
        let mut service = TemplateService::new(TemplateStore::seeded());
        let template = service
            .create(
                TemplateDraft::new("Patio Check")
                    .with_section(SectionDraft::new("Yard").with_item(ItemDraft::new("Fence"))),
            )
            .unwrap();
        (service, template)
    }

    #[test]
    fn test_begin_copies_template() {
        let (service, template) = single_item_service();
        let mut session = service.begin_edit(&template.id).unwrap();

        session.set_field(TemplateField::Name("Changed".to_string())).unwrap();

        assert_eq!(session.state(), SessionState::Editing);
        assert!(session.is_dirty());
        assert_eq!(service.get(&template.id).unwrap().name, "Patio Check");
    }

    #[test]
    fn test_delete_last_item_is_rejected() {
        let (service, template) = single_item_service();
        let mut session = service.begin_edit(&template.id).unwrap();
        let section_id = template.sections[0].id.clone();
        let item_id = template.sections[0].items[0].id.clone();

        let result = session.delete_item(&section_id, &item_id);

        assert!(matches!(result, Err(TemplateError::MinimumViolation(_))));
        assert_eq!(session.template(), &template);
        assert!(!session.is_dirty());
        assert_eq!(service.get(&template.id).unwrap(), &template);
    }

    #[test]
    fn test_delete_last_section_is_rejected() {
        let (service, template) = single_item_service();
        let mut session = service.begin_edit(&template.id).unwrap();

        let result = session.delete_section(&template.sections[0].id);

        assert!(matches!(result, Err(TemplateError::MinimumViolation(_))));
        assert_eq!(session.template().sections.len(), 1);
    }

    #[test]
    fn test_add_section_has_placeholder_item() {
        let (service, template) = single_item_service();
        let mut session = service.begin_edit(&template.id).unwrap();

        let section_id = session.add_section().unwrap();

        let section = session.template().section(&section_id).unwrap();
        assert_eq!(section.name, "New Section");
        assert!(section.is_expanded);
        assert_eq!(section.items.len(), 1);
        assert_eq!(section.items[0].name, "New Item");
        assert_ne!(section_id, template.sections[0].id);
    }

    #[test]
    fn test_placeholder_names_follow_settings() {
        let (service, template) = single_item_service();
        let settings = EditingSettings {
            new_section_name: "Room".to_string(),
            new_item_name: "Checkpoint".to_string(),
        };
        let mut session = EditingSession::begin_with(service.get(&template.id).unwrap(), settings);

        let section_id = session.add_section().unwrap();
        let section = session.template().section(&section_id).unwrap();
        assert_eq!(section.name, "Room");
        assert_eq!(section.items[0].name, "Checkpoint");
    }

    #[test]
    fn test_add_and_delete_items_and_sections() {
        let (mut service, template) = single_item_service();
        let mut session = service.begin_edit(&template.id).unwrap();
        let yard = template.sections[0].id.clone();
        let fence = template.sections[0].items[0].id.clone();

        let gate = session.add_item(&yard).unwrap();
        session.update_item(&yard, &gate, ItemField::Name("Gate".to_string())).unwrap();
        session.update_item(&yard, &gate, ItemField::Required(true)).unwrap();
        session.delete_item(&yard, &fence).unwrap();

        let deck = session.add_section().unwrap();
        session.update_section(&deck, SectionField::Name("Deck".to_string())).unwrap();
        session.delete_section(&yard).unwrap();

        let saved = session.commit(&mut service).unwrap();
        assert_eq!(saved.sections.len(), 1);
        assert_eq!(saved.sections[0].name, "Deck");
        assert_eq!(service.get(&template.id).unwrap(), &saved);
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let (service, template) = single_item_service();
        let mut session = service.begin_edit(&template.id).unwrap();
        let yard = template.sections[0].id.clone();
        let missing_section = SectionId::from("missing");
        let missing_item = ItemId::from("missing");

        assert!(matches!(
            session.update_section(&missing_section, SectionField::Expanded(false)),
            Err(TemplateError::NotFound(_))
        ));
        assert!(matches!(session.add_item(&missing_section), Err(TemplateError::NotFound(_))));
        assert!(matches!(
            session.update_item(&yard, &missing_item, ItemField::Required(true)),
            Err(TemplateError::NotFound(_))
        ));
        assert!(matches!(
            session.delete_item(&yard, &missing_item),
            Err(TemplateError::NotFound(_))
        ));
        assert!(matches!(
            session.delete_section(&missing_section),
            Err(TemplateError::NotFound(_))
        ));
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_toggle_section() {
        let (service, template) = single_item_service();
        let mut session = service.begin_edit(&template.id).unwrap();
        let yard = template.sections[0].id.clone();

        assert!(!session.toggle_section(&yard).unwrap());
        assert!(session.toggle_section(&yard).unwrap());
    }

    #[test]
    fn test_commit_updates_store_and_closes_session() {
        let (mut service, template) = single_item_service();
        let mut session = service.begin_edit(&template.id).unwrap();
        session.set_field(TemplateField::Description("Back yard".to_string())).unwrap();
        session.set_field(TemplateField::Type(TemplateType::Maintenance)).unwrap();

        let saved = session.commit(&mut service).unwrap();

        assert_eq!(saved.description, "Back yard");
        assert_eq!(saved.template_type, TemplateType::Maintenance);
        assert_eq!(saved.created_at, template.created_at);
        assert!(saved.updated_at >= template.updated_at);
        assert_eq!(session.state(), SessionState::Committed);
        assert_eq!(session.add_section(), Err(TemplateError::SessionClosed));
        assert_eq!(session.commit(&mut service), Err(TemplateError::SessionClosed));
    }

    #[test]
    fn test_commit_with_blank_name_keeps_session_open() {
        let (mut service, template) = single_item_service();
        let mut session = service.begin_edit(&template.id).unwrap();
        session.set_field(TemplateField::Name("  ".to_string())).unwrap();

        let result = session.commit(&mut service);
        assert!(matches!(result, Err(TemplateError::Validation(_))));
        assert_eq!(session.state(), SessionState::Editing);
        assert_eq!(service.get(&template.id).unwrap(), &template);

        session.set_field(TemplateField::Name("Patio".to_string())).unwrap();
        assert_eq!(session.commit(&mut service).unwrap().name, "Patio");
    }

    #[test]
    fn test_commit_of_deleted_template_is_not_found() {
        let (mut service, template) = single_item_service();
        let mut session = service.begin_edit(&template.id).unwrap();
        service.delete(&template.id).unwrap();

        let result = session.commit(&mut service);
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn test_discard_leaves_store_untouched() {
        let (service, template) = single_item_service();
        let mut session = service.begin_edit(&template.id).unwrap();
        session.add_section().unwrap();

        session.discard().unwrap();

        assert_eq!(session.state(), SessionState::Discarded);
        assert_eq!(service.get(&template.id).unwrap(), &template);
        assert_eq!(session.discard(), Err(TemplateError::SessionClosed));
        assert_eq!(
            session.set_field(TemplateField::Name("X".to_string())),
            Err(TemplateError::SessionClosed)
        );
    }

    fn assert_rejects_edits(session: &mut EditingSession, section: &SectionId, item: &ItemId) {
        let closed = Err(TemplateError::SessionClosed);
        assert_eq!(session.add_item(section), Err(TemplateError::SessionClosed));
        assert_eq!(session.update_item(section, item, ItemField::Required(true)), closed);
        assert_eq!(session.delete_item(section, item), closed);
        assert_eq!(
            session.update_section(section, SectionField::Name("Renamed".to_string())),
            closed
        );
        assert_eq!(session.delete_section(section), closed);
        assert_eq!(session.toggle_section(section), Err(TemplateError::SessionClosed));
    }

    #[test]
    fn test_closed_session_rejects_every_edit() {
        let (mut service, template) = single_item_service();
        let section_id = template.sections[0].id.clone();
        let item_id = template.sections[0].items[0].id.clone();

        let mut committed = service.begin_edit(&template.id).unwrap();
        committed.commit(&mut service).unwrap();
        assert_rejects_edits(&mut committed, &section_id, &item_id);

        let mut discarded = service.begin_edit(&template.id).unwrap();
        discarded.discard().unwrap();
        assert_rejects_edits(&mut discarded, &section_id, &item_id);

        assert_eq!(service.get(&template.id).unwrap().sections, template.sections);
    }

    #[test]
    fn test_default_template_type_is_locked() {
        let service = TemplateService::new(TemplateStore::seeded());
        let mut session = service.begin_edit(&TemplateId::from("default-routine")).unwrap();

        let result = session.set_field(TemplateField::Type(TemplateType::Custom));
        assert!(matches!(result, Err(TemplateError::ProtectedRecord(_))));
        assert_eq!(session.template().template_type, TemplateType::Routine);

        session.set_field(TemplateField::Type(TemplateType::Routine)).unwrap();
    }

    #[test]
    fn test_last_commit_wins() {
        let (mut service, template) = single_item_service();
        let mut first = service.begin_edit(&template.id).unwrap();
        let mut second = service.begin_edit(&template.id).unwrap();

        first.set_field(TemplateField::Name("First".to_string())).unwrap();
        second.set_field(TemplateField::Description("Second".to_string())).unwrap();

        first.commit(&mut service).unwrap();
        second.commit(&mut service).unwrap();

        let stored = service.get(&template.id).unwrap();
        assert_eq!(stored.name, "Patio Check");
        assert_eq!(stored.description, "Second");
    }
}
