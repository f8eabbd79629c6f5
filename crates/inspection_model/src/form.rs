//! Fillable inspection forms built from templates

use crate::{InspectionItem, InspectionTemplate, ItemId, SectionId};
use serde::{Deserialize, Serialize};

/// Outcome recorded for a form item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Pass,
    Fail,
}

/// Opaque reference to a captured photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(pub String);

impl From<&str> for PhotoRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A template item plus the fields an inspector fills in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionFormItem {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub required: bool,
    pub rating: Option<Rating>,
    pub comments: String,
    pub photos: Vec<PhotoRef>,
}

impl InspectionFormItem {
    /// Record a rating
    pub fn set_rating(&mut self, rating: Rating) {
        self.rating = Some(rating);
    }

    /// Attach a photo
    pub fn add_photo(&mut self, photo: PhotoRef) {
        self.photos.push(photo);
    }
}

impl From<&InspectionItem> for InspectionFormItem {
    fn from(item: &InspectionItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            required: item.required,
            rating: None,
            comments: String::new(),
            photos: Vec::new(),
        }
    }
}

/// A section of a fillable form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionFormSection {
    pub id: SectionId,
    pub name: String,
    pub is_expanded: bool,
    pub items: Vec<InspectionFormItem>,
}

impl InspectionFormSection {
    /// Find an item by ID for mutation
    pub fn item_mut(&mut self, item_id: &ItemId) -> Option<&mut InspectionFormItem> {
        self.items.iter_mut().find(|i| &i.id == item_id)
    }
}

/// Convert a template into empty form sections.
///
/// Section and item order match the template; every item starts unrated with
/// no comments or photos.
pub fn materialize(template: &InspectionTemplate) -> Vec<InspectionFormSection> {
    template
        .sections
        .iter()
        .map(|section| InspectionFormSection {
            id: section.id.clone(),
            name: section.name.clone(),
            is_expanded: section.is_expanded,
            items: section.items.iter().map(InspectionFormItem::from).collect(),
        })
        .collect()
}

/// Pass/fail tally over a filled form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub unrated: usize,
    /// Required items that have no rating yet
    pub missing_required: usize,
}

impl FormSummary {
    /// Whether every required item has been rated
    pub fn is_complete(&self) -> bool {
        self.missing_required == 0
    }
}

/// Count ratings across all sections of a form
pub fn summarize(sections: &[InspectionFormSection]) -> FormSummary {
    let mut summary = FormSummary::default();
    for item in sections.iter().flat_map(|s| s.items.iter()) {
        summary.total += 1;
        match item.rating {
            Some(Rating::Pass) => summary.passed += 1,
            Some(Rating::Fail) => summary.failed += 1,
            None => {
                summary.unrated += 1;
                if item.required {
                    summary.missing_required += 1;
                }
            }
        }
    }
    summary
}
