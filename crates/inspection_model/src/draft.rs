//! Inputs for creating and patching templates
//!
//! Drafts never carry identifiers or timestamps; those are assigned when a
//! draft is turned into a stored template.

use crate::{InspectionItem, InspectionSection, InspectionTemplate, TemplateType};
use serde::{Deserialize, Serialize};

fn default_expanded() -> bool {
    true
}

/// An item without an identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
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

impl From<&InspectionItem> for ItemDraft {
    fn from(item: &InspectionItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            required: item.required,
        }
    }
}

/// A section without identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDraft {
    pub name: String,
    #[serde(default = "default_expanded")]
    pub is_expanded: bool,
    #[serde(default)]
    pub items: Vec<ItemDraft>,
}

impl SectionDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_expanded: true,
            items: Vec::new(),
        }
    }

    /// Append an item
    pub fn with_item(mut self, item: ItemDraft) -> Self {
        self.items.push(item);
        self
    }
}

impl From<&InspectionSection> for SectionDraft {
    fn from(section: &InspectionSection) -> Self {
        Self {
            name: section.name.clone(),
            is_expanded: section.is_expanded,
            items: section.items.iter().map(ItemDraft::from).collect(),
        }
    }
}

/// Input for creating a template.
///
/// `is_default` is accepted so callers can round-trip a template, but it is
/// always cleared on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub template_type: TemplateType,
    #[serde(default)]
    pub sections: Vec<SectionDraft>,
    #[serde(default)]
    pub is_default: bool,
}

impl TemplateDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            template_type: TemplateType::default(),
            sections: Vec::new(),
            is_default: false,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the template type
    pub fn with_type(mut self, template_type: TemplateType) -> Self {
        self.template_type = template_type;
        self
    }

    /// Append a section
    pub fn with_section(mut self, section: SectionDraft) -> Self {
        self.sections.push(section);
        self
    }

    /// Deep copy of a template's content, dropping every identifier
    pub fn from_template(template: &InspectionTemplate) -> Self {
        Self {
            name: template.name.clone(),
            description: template.description.clone(),
            template_type: template.template_type,
            sections: template.sections.iter().map(SectionDraft::from).collect(),
            is_default: template.is_default,
        }
    }
}

/// Field-level update for a stored template.
///
/// Only these fields may change after creation; the ID, creation time, and
/// default flag are fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub template_type: Option<TemplateType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<InspectionSection>>,
}

impl TemplatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn template_type(mut self, template_type: TemplateType) -> Self {
        self.template_type = Some(template_type);
        self
    }

    pub fn sections(mut self, sections: Vec<InspectionSection>) -> Self {
        self.sections = Some(sections);
        self
    }

    /// Patch that replaces every mutable field with the template's values
    pub fn replace_with(template: &InspectionTemplate) -> Self {
        Self {
            name: Some(template.name.clone()),
            description: Some(template.description.clone()),
            template_type: Some(template.template_type),
            sections: Some(template.sections.clone()),
        }
    }

    /// Apply the patch to a template in place
    pub fn apply_to(self, template: &mut InspectionTemplate) {
        if let Some(name) = self.name {
            template.name = name;
        }
        if let Some(description) = self.description {
            template.description = description;
        }
        if let Some(template_type) = self.template_type {
            template.template_type = template_type;
        }
        if let Some(sections) = self.sections {
            template.sections = sections;
        }
    }
}
