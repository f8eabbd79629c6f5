//! Inspection template structures

use crate::{ItemId, SectionId, TemplateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of inspection a template is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateType {
    /// Periodic condition check
    #[default]
    Routine,
    /// Check performed when a tenant moves in
    MoveIn,
    /// Check performed when a tenant moves out
    MoveOut,
    /// Follow-up on a maintenance request
    Maintenance,
    /// User-defined purpose
    Custom,
}

impl TemplateType {
    /// All template types, in display order
    pub const ALL: [TemplateType; 5] = [
        TemplateType::Routine,
        TemplateType::MoveIn,
        TemplateType::MoveOut,
        TemplateType::Maintenance,
        TemplateType::Custom,
    ];

    /// Get a display name for the template type
    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateType::Routine => "Routine",
            TemplateType::MoveIn => "Move-In",
            TemplateType::MoveOut => "Move-Out",
            TemplateType::Maintenance => "Maintenance",
            TemplateType::Custom => "Custom",
        }
    }
}

impl std::fmt::Display for TemplateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self {
            TemplateType::Routine => "routine",
            TemplateType::MoveIn => "move-in",
            TemplateType::MoveOut => "move-out",
            TemplateType::Maintenance => "maintenance",
            TemplateType::Custom => "custom",
        };
        write!(f, "{}", key)
    }
}

/// A single checklist entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionItem {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    /// Whether the inspector must rate this item
    pub required: bool,
}

impl InspectionItem {
    /// Create an optional item with an empty description
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            required: false,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the item as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A named group of items.
///
/// Once a section exists it always holds at least one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionSection {
    pub id: SectionId,
    pub name: String,
    pub is_expanded: bool,
    pub items: Vec<InspectionItem>,
}

impl InspectionSection {
    /// Create an expanded section with the given items
    pub fn new(id: SectionId, name: impl Into<String>, items: Vec<InspectionItem>) -> Self {
        Self {
            id,
            name: name.into(),
            is_expanded: true,
            items,
        }
    }

    /// Find an item by ID
    pub fn item(&self, item_id: &ItemId) -> Option<&InspectionItem> {
        self.items.iter().find(|i| &i.id == item_id)
    }

    /// Find an item by ID for mutation
    pub fn item_mut(&mut self, item_id: &ItemId) -> Option<&mut InspectionItem> {
        self.items.iter_mut().find(|i| &i.id == item_id)
    }
}

/// A reusable inspection checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionTemplate {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub sections: Vec<InspectionSection>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Seeded templates are protected from deletion and type changes
    pub is_default: bool,
}

impl InspectionTemplate {
    /// Find a section by ID
    pub fn section(&self, section_id: &SectionId) -> Option<&InspectionSection> {
        self.sections.iter().find(|s| &s.id == section_id)
    }

    /// Find a section by ID for mutation
    pub fn section_mut(&mut self, section_id: &SectionId) -> Option<&mut InspectionSection> {
        self.sections.iter_mut().find(|s| &s.id == section_id)
    }

    /// Total number of items across all sections
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    /// Iterate over every section ID
    pub fn section_ids(&self) -> impl Iterator<Item = &SectionId> {
        self.sections.iter().map(|s| &s.id)
    }

    /// Iterate over every item ID in every section
    pub fn item_ids(&self) -> impl Iterator<Item = &ItemId> {
        self.sections.iter().flat_map(|s| s.items.iter().map(|i| &i.id))
    }
}
