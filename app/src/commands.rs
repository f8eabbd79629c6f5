//! Commands for template operations
//!
//! Each command takes the shared [`TemplateState`] and returns a serializable
//! DTO. Requests arrive as one JSON object per line, tagged by `command`.

use crate::state::TemplateState;
use chrono::{DateTime, Utc};
use inspection_model::{
    materialize, summarize, FormSummary, InspectionFormSection, InspectionTemplate, ItemId,
    SectionId, TemplateDraft, TemplateId, TemplatePatch, TemplateType,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};
use store::{EditingSession, ItemField, SectionField, TemplateError, TemplateField};

// =============================================================================
// DTOs for Template Operations
// =============================================================================

/// Template summary DTO for listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummaryDto {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    /// Human-readable type, e.g. "Move-In"
    pub type_label: String,
    pub is_default: bool,
    pub section_count: usize,
    pub item_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl From<&InspectionTemplate> for TemplateSummaryDto {
    fn from(template: &InspectionTemplate) -> Self {
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            description: template.description.clone(),
            template_type: template.template_type,
            type_label: template.template_type.display_name().to_string(),
            is_default: template.is_default,
            section_count: template.sections.len(),
            item_count: template.item_count(),
            updated_at: template.updated_at,
        }
    }
}

/// A fillable form built from a template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionFormDto {
    pub template_id: TemplateId,
    pub template_name: String,
    pub sections: Vec<InspectionFormSection>,
    pub summary: FormSummary,
}

/// An open editing session and its working copy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSessionDto {
    pub session_id: String,
    pub template: InspectionTemplate,
    pub dirty: bool,
}

impl EditSessionDto {
    fn new(session_id: &str, session: &EditingSession) -> Self {
        Self {
            session_id: session_id.to_string(),
            template: session.template().clone(),
            dirty: session.is_dirty(),
        }
    }
}

/// Error returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    /// Machine-readable kind, e.g. `notFound` or `minimumViolation`
    pub kind: String,
    pub message: String,
}

impl CommandError {
    fn new(kind: &str, message: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new("internal", message)
    }

    /// The request could not be decoded
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new("invalidRequest", message)
    }
}

impl From<TemplateError> for CommandError {
    fn from(e: TemplateError) -> Self {
        Self::new(e.kind(), e.to_string())
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

// =============================================================================
// Requests
// =============================================================================

/// A single edit applied to an open session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SessionEdit {
    SetName { value: String },
    SetDescription { value: String },
    SetType { value: TemplateType },
    AddSection,
    RenameSection {
        section_id: SectionId,
        value: String,
    },
    ToggleSection { section_id: SectionId },
    DeleteSection { section_id: SectionId },
    AddItem { section_id: SectionId },
    RenameItem {
        section_id: SectionId,
        item_id: ItemId,
        value: String,
    },
    SetItemDescription {
        section_id: SectionId,
        item_id: ItemId,
        value: String,
    },
    SetItemRequired {
        section_id: SectionId,
        item_id: ItemId,
        value: bool,
    },
    DeleteItem {
        section_id: SectionId,
        item_id: ItemId,
    },
}

/// A request read from the command stream
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    ListTemplates,
    GetTemplate { id: TemplateId },
    SearchTemplates { query: String },
    FilterTemplatesByType {
        #[serde(rename = "type")]
        template_type: TemplateType,
    },
    CreateTemplate { draft: TemplateDraft },
    UpdateTemplate {
        id: TemplateId,
        patch: TemplatePatch,
    },
    DeleteTemplate { id: TemplateId },
    DuplicateTemplate { id: TemplateId },
    MaterializeTemplate { id: TemplateId },
    ResetTemplates,
    BeginEdit { id: TemplateId },
    EditSession {
        session_id: String,
        edit: SessionEdit,
    },
    CommitEdit { session_id: String },
    DiscardEdit { session_id: String },
}

/// A response written to the command stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl From<CommandResult<Value>> for Response {
    fn from(result: CommandResult<Value>) -> Self {
        match result {
            Ok(data) => Self {
                ok: true,
                data: Some(data),
                error: None,
            },
            Err(error) => Self {
                ok: false,
                data: None,
                error: Some(error),
            },
        }
    }
}

// =============================================================================
// Template Commands
// =============================================================================

fn lock<T>(mutex: &Mutex<T>) -> CommandResult<MutexGuard<'_, T>> {
    mutex.lock().map_err(|e| CommandError::internal(e.to_string()))
}

/// List all templates
pub fn list_templates(state: &TemplateState) -> CommandResult<Vec<TemplateSummaryDto>> {
    let service = lock(&state.service)?;
    Ok(service.list().iter().map(TemplateSummaryDto::from).collect())
}

/// Get a full template
pub fn get_template(id: &TemplateId, state: &TemplateState) -> CommandResult<InspectionTemplate> {
    let service = lock(&state.service)?;
    Ok(service.get(id)?.clone())
}

/// Search templates by query
pub fn search_templates(
    query: &str,
    state: &TemplateState,
) -> CommandResult<Vec<TemplateSummaryDto>> {
    let service = lock(&state.service)?;
    Ok(service
        .search(query)
        .into_iter()
        .map(TemplateSummaryDto::from)
        .collect())
}

/// Filter templates by type
pub fn filter_templates_by_type(
    template_type: TemplateType,
    state: &TemplateState,
) -> CommandResult<Vec<TemplateSummaryDto>> {
    let service = lock(&state.service)?;
    Ok(service
        .filter_by_type(template_type)
        .into_iter()
        .map(TemplateSummaryDto::from)
        .collect())
}

/// Create a template from a draft
pub fn create_template(
    draft: TemplateDraft,
    state: &TemplateState,
) -> CommandResult<InspectionTemplate> {
    let mut service = lock(&state.service)?;
    Ok(service.create(draft)?)
}

/// Apply a patch to a template
pub fn update_template(
    id: &TemplateId,
    patch: TemplatePatch,
    state: &TemplateState,
) -> CommandResult<InspectionTemplate> {
    let mut service = lock(&state.service)?;
    Ok(service.update(id, patch)?)
}

/// Delete a template
pub fn delete_template(id: &TemplateId, state: &TemplateState) -> CommandResult<()> {
    let mut service = lock(&state.service)?;
    Ok(service.delete(id)?)
}

/// Duplicate a template
pub fn duplicate_template(
    id: &TemplateId,
    state: &TemplateState,
) -> CommandResult<InspectionTemplate> {
    let mut service = lock(&state.service)?;
    Ok(service.duplicate(id)?)
}

/// Build an empty inspection form from a template
pub fn materialize_template(
    id: &TemplateId,
    state: &TemplateState,
) -> CommandResult<InspectionFormDto> {
    let service = lock(&state.service)?;
    let template = service.get(id)?;
    let sections = materialize(template);
    let summary = summarize(&sections);
    Ok(InspectionFormDto {
        template_id: template.id.clone(),
        template_name: template.name.clone(),
        sections,
        summary,
    })
}

/// Restore the default templates and drop every open session
pub fn reset_templates(state: &TemplateState) -> CommandResult<Vec<TemplateSummaryDto>> {
    let mut sessions = lock(&state.sessions)?;
    let mut service = lock(&state.service)?;
    sessions.clear();
    service.reset();
    Ok(service.list().iter().map(TemplateSummaryDto::from).collect())
}

// =============================================================================
// Editing Session Commands
// =============================================================================

/// Open an editing session on a template
pub fn begin_edit(id: &TemplateId, state: &TemplateState) -> CommandResult<EditSessionDto> {
    let session = {
        let service = lock(&state.service)?;
        service.begin_edit(id)?
    };

    let session_id = uuid::Uuid::new_v4().to_string();
    let dto = EditSessionDto::new(&session_id, &session);
    let mut sessions = lock(&state.sessions)?;
    sessions.insert(session_id, session);
    Ok(dto)
}

fn apply_edit(session: &mut EditingSession, edit: SessionEdit) -> Result<(), TemplateError> {
    match edit {
        SessionEdit::SetName { value } => session.set_field(TemplateField::Name(value)),
        SessionEdit::SetDescription { value } => {
            session.set_field(TemplateField::Description(value))
        }
        SessionEdit::SetType { value } => session.set_field(TemplateField::Type(value)),
        SessionEdit::AddSection => session.add_section().map(|_| ()),
        SessionEdit::RenameSection { section_id, value } => {
            session.update_section(&section_id, SectionField::Name(value))
        }
        SessionEdit::ToggleSection { section_id } => {
            session.toggle_section(&section_id).map(|_| ())
        }
        SessionEdit::DeleteSection { section_id } => session.delete_section(&section_id),
        SessionEdit::AddItem { section_id } => session.add_item(&section_id).map(|_| ()),
        SessionEdit::RenameItem { section_id, item_id, value } => {
            session.update_item(&section_id, &item_id, ItemField::Name(value))
        }
        SessionEdit::SetItemDescription { section_id, item_id, value } => {
            session.update_item(&section_id, &item_id, ItemField::Description(value))
        }
        SessionEdit::SetItemRequired { section_id, item_id, value } => {
            session.update_item(&section_id, &item_id, ItemField::Required(value))
        }
        SessionEdit::DeleteItem { section_id, item_id } => {
            session.delete_item(&section_id, &item_id)
        }
    }
}

fn session_not_found(session_id: &str) -> CommandError {
    CommandError::from(TemplateError::NotFound(format!("session {}", session_id)))
}

/// Apply one edit to an open session
pub fn edit_session(
    session_id: &str,
    edit: SessionEdit,
    state: &TemplateState,
) -> CommandResult<EditSessionDto> {
    let mut sessions = lock(&state.sessions)?;
    let session = sessions
        .get_mut(session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    apply_edit(session, edit)?;
    Ok(EditSessionDto::new(session_id, session))
}

/// Commit an open session. The session is closed on success.
pub fn commit_edit(session_id: &str, state: &TemplateState) -> CommandResult<InspectionTemplate> {
    let mut sessions = lock(&state.sessions)?;
    let session = sessions
        .get_mut(session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    let mut service = lock(&state.service)?;
    let saved = session.commit(&mut service)?;
    sessions.remove(session_id);
    Ok(saved)
}

/// Discard an open session without touching the store
pub fn discard_edit(session_id: &str, state: &TemplateState) -> CommandResult<()> {
    let mut sessions = lock(&state.sessions)?;
    let mut session = sessions
        .remove(session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    Ok(session.discard()?)
}

// =============================================================================
// Dispatch
// =============================================================================

fn to_json<T: Serialize>(value: T) -> CommandResult<Value> {
    serde_json::to_value(value).map_err(|e| CommandError::internal(e.to_string()))
}

/// Run a request against the state
pub fn dispatch(request: Request, state: &TemplateState) -> CommandResult<Value> {
    match request {
        Request::ListTemplates => to_json(list_templates(state)?),
        Request::GetTemplate { id } => to_json(get_template(&id, state)?),
        Request::SearchTemplates { query } => to_json(search_templates(&query, state)?),
        Request::FilterTemplatesByType { template_type } => {
            to_json(filter_templates_by_type(template_type, state)?)
        }
        Request::CreateTemplate { draft } => to_json(create_template(draft, state)?),
        Request::UpdateTemplate { id, patch } => to_json(update_template(&id, patch, state)?),
        Request::DeleteTemplate { id } => to_json(delete_template(&id, state)?),
        Request::DuplicateTemplate { id } => to_json(duplicate_template(&id, state)?),
        Request::MaterializeTemplate { id } => to_json(materialize_template(&id, state)?),
        Request::ResetTemplates => to_json(reset_templates(state)?),
        Request::BeginEdit { id } => to_json(begin_edit(&id, state)?),
        Request::EditSession { session_id, edit } => {
            to_json(edit_session(&session_id, edit, state)?)
        }
        Request::CommitEdit { session_id } => to_json(commit_edit(&session_id, state)?),
        Request::DiscardEdit { session_id } => to_json(discard_edit(&session_id, state)?),
    }
}

/// Parse and run one line of the command stream
pub fn handle_line(line: &str, state: &TemplateState) -> Response {
    let result = serde_json::from_str::<Request>(line)
        .map_err(|e| CommandError::invalid_request(e.to_string()))
        .and_then(|request| {
            tracing::debug!("Dispatching {:?}", request);
            dispatch(request, state)
        });

    if let Err(error) = &result {
        tracing::warn!("Command failed ({}): {}", error.kind, error.message);
    }
    Response::from(result)
}
