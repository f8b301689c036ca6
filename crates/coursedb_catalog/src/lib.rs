//! # coursedb catalog
//!
//! Domain documents and read-side services for the course platform:
//!
//! - Persisted document types (courses, sections, lessons, access
//!   grants, suggestions, category order)
//! - Curriculum assembly (nested section/lesson view)
//! - Deterministic category colors
//! - Subscriber access checks
//!
//! Documents serialize with camelCase field names so the wire format
//! matches existing authoring payloads.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod access;
mod categories;
mod colors;
mod curriculum;
mod documents;
mod error;

pub use access::AccessControl;
pub use categories::{category_order, set_category_order};
pub use colors::category_color;
pub use curriculum::{assemble, require_course, CurriculumLesson, CurriculumSection};
pub use documents::{
    collections, AccessGrant, CategoryOrderDoc, CourseDoc, LessonDoc, SectionDoc, SuggestionDoc,
    CATEGORY_ORDER_ID, UNIVERSAL_SCOPE,
};
pub use error::{CatalogError, CatalogResult};
