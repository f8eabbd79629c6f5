//! Application state management

use std::collections::HashMap;
use std::sync::Mutex;
use store::{AppSettings, EditingSession, TemplateService};

/// Template state wrapper for thread-safe access
pub struct TemplateState {
    /// Template service owning the in-memory store
    pub service: Mutex<TemplateService>,
    /// Open editing sessions keyed by session ID
    pub sessions: Mutex<HashMap<String, EditingSession>>,
}

impl TemplateState {
    /// Create template state from loaded settings
    pub fn new(settings: &AppSettings) -> Self {
        let service = TemplateService::from_settings(settings);
        tracing::info!("Template store ready with {} templates", service.store().len());
        Self {
            service: Mutex::new(service),
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for TemplateState {
    fn default() -> Self {
        Self::new(&AppSettings::default())
    }
}
