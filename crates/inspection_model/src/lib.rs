//! Inspection Model - templates, sections, items, and fillable forms
//!
//! This crate provides:
//! - Identifier newtypes for templates, sections, and items
//! - The inspection template structures
//! - Drafts and patches used to create and update templates
//! - Form materialization for capturing inspection results

mod ids;
mod template;
mod draft;
mod form;

pub use ids::*;
pub use template::*;
pub use draft::*;
pub use form::*;
