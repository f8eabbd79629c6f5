//! Inspection template system
//!
//! This module provides:
//! - The in-memory template store, seeded with protected defaults
//! - Template CRUD operations with invariant checks
//! - Editing sessions that stage changes before committing them

mod defaults;
mod store;
mod service;
mod session;
mod error;


pub use defaults::*;
pub use self::store::*;
pub use service::TemplateService;
pub use session::*;
pub use error::*;
