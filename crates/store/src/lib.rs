//! Store - Template storage, editing sessions, and settings
//!
//! This crate owns the authoritative collection of inspection templates,
//! the service that enforces their invariants, editing sessions that stage
//! changes, and application settings persistence.

mod error;
mod settings;
pub mod templates;

pub use error::*;
pub use settings::*;

// Re-export template functionality
pub use templates::{
    default_templates, EditingSession, ItemField, SectionField, SessionState, TemplateError,
    TemplateField, TemplateResult, TemplateService, TemplateStore,
};
