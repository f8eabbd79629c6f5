//! Error types for template operations

use thiserror::Error;

/// Errors that can occur during template operations.
///
/// All variants are recoverable; callers surface them to the user as messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// An ID does not resolve to any record
    #[error("Not found: {0}")]
    NotFound(String),

    /// Structurally invalid input
    #[error("Invalid template: {0}")]
    Validation(String),

    /// Attempted deletion or type change of a default template
    #[error("Template is protected: {0}")]
    ProtectedRecord(String),

    /// Attempted removal of the last section or the last item in a section
    #[error("Cannot remove the last {0}")]
    MinimumViolation(String),

    /// Operation on an editing session that was already committed or discarded
    #[error("Editing session is closed")]
    SessionClosed,
}

impl TemplateError {
    /// Stable machine-readable name for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            TemplateError::NotFound(_) => "notFound",
            TemplateError::Validation(_) => "validationError",
            TemplateError::ProtectedRecord(_) => "protectedRecord",
            TemplateError::MinimumViolation(_) => "minimumViolation",
            TemplateError::SessionClosed => "sessionClosed",
        }
    }
}

/// Result type for template operations
pub type TemplateResult<T> = std::result::Result<T, TemplateError>;
