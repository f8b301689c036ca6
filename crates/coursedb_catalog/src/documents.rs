//! Persisted document types.
//!
//! Field names on the wire stay camelCase for compatibility with
//! existing authoring payloads; documents are replaced wholesale on
//! write, never merged.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Names of the store collections the catalog uses.
pub mod collections {
    /// Course meta documents, keyed by `slug`.
    pub const COURSES: &str = "courses";
    /// Section documents, keyed by `(course_slug, index)`.
    pub const SECTIONS: &str = "sections";
    /// Lesson documents, keyed by `(course_slug, slug)`.
    pub const LESSONS: &str = "lessons";
    /// Access grants, keyed by `(email, scope)`.
    pub const ACCESS_GRANTS: &str = "access_grants";
    /// Course suggestions from visitors.
    pub const SUGGESTIONS: &str = "suggestions";
    /// The singleton category ordering document.
    pub const CATEGORY_ORDER: &str = "category_order";
}

/// A course meta document.
///
/// Display and SEO fields are opaque to the deploy reconciler; the
/// whole document is replaced on every deploy. Fields the catalog
/// does not model are preserved through `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDoc {
    /// URL-safe unique identifier.
    pub slug: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Display subtitle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Long-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Short description shown on listing pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    /// Bullet points of learning outcomes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub what_youll_learn: Vec<String>,
    /// Category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// SEO page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    /// SEO meta description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    /// Unmodeled fields, carried through verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CourseDoc {
    /// Creates a minimal course document.
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            subtitle: None,
            description: None,
            short_description: None,
            what_youll_learn: Vec::new(),
            category: None,
            seo_title: None,
            meta_description: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// A section document.
///
/// Sections belong to exactly one course and are identified within it
/// by their zero-based display `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDoc {
    /// Slug of the owning course.
    pub course_slug: String,
    /// Zero-based display order within the course.
    pub index: u32,
    /// Section title.
    pub title: String,
}

/// A lesson document.
///
/// `section_index` is a denormalized reference to the owning section's
/// index within the course, not an ownership pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDoc {
    /// Slug of the owning course.
    pub course_slug: String,
    /// URL-safe identifier, unique within the course.
    pub slug: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// SEO page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    /// SEO meta description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    /// Lesson body, plain text or markdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Whether `body` is markdown.
    #[serde(default)]
    pub is_markdown: bool,
    /// Index of the owning section within the course.
    pub section_index: u32,
}

/// An access grant for a subscriber email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    /// Subscriber email.
    pub email: String,
    /// Grant scope. `"universal"` unlocks all gated lessons.
    pub scope: String,
    /// Unix millis at grant creation.
    pub created_at_ms: u64,
}

/// The scope that unlocks every gated lesson.
pub const UNIVERSAL_SCOPE: &str = "universal";

impl AccessGrant {
    /// Creates a grant under the universal scope.
    pub fn universal(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            scope: UNIVERSAL_SCOPE.to_string(),
            created_at_ms: now_ms(),
        }
    }
}

/// A course suggestion submitted by a visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionDoc {
    /// Suggestion identifier.
    pub id: uuid::Uuid,
    /// Submitter email, when given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Free-form suggestion text.
    pub text: String,
    /// Unix millis at submission.
    pub created_at_ms: u64,
}

impl SuggestionDoc {
    /// Creates a suggestion with a fresh id.
    pub fn new(email: Option<String>, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            email,
            text: text.into(),
            created_at_ms: now_ms(),
        }
    }
}

/// The singleton document holding homepage category ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOrderDoc {
    /// Document id; always `"default"`.
    pub id: String,
    /// Category names in display order.
    pub order: Vec<String>,
    /// Unix millis of the last update.
    pub updated_at_ms: u64,
}

/// Id of the singleton category-order document.
pub const CATEGORY_ORDER_ID: &str = "default";

impl CategoryOrderDoc {
    /// Creates the singleton ordering document.
    pub fn new(order: Vec<String>) -> Self {
        Self {
            id: CATEGORY_ORDER_ID.to_string(),
            order,
            updated_at_ms: now_ms(),
        }
    }
}

/// Current wall-clock time as Unix millis.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_wire_format_is_camel_case() {
        let mut course = CourseDoc::new("go-basics", "Go Basics");
        course.short_description = Some("Learn Go".into());
        let json = serde_json::to_value(&course).unwrap();
        assert_eq!(json["slug"], "go-basics");
        assert_eq!(json["shortDescription"], "Learn Go");
    }

    #[test]
    fn course_preserves_unknown_fields() {
        let json = serde_json::json!({
            "slug": "go-basics",
            "title": "Go Basics",
            "heroImage": "go.png"
        });
        let course: CourseDoc = serde_json::from_value(json).unwrap();
        assert_eq!(course.extra["heroImage"], "go.png");

        let back = serde_json::to_value(&course).unwrap();
        assert_eq!(back["heroImage"], "go.png");
    }

    #[test]
    fn lesson_defaults() {
        let json = serde_json::json!({
            "courseSlug": "go-basics",
            "slug": "hello",
            "sectionIndex": 0
        });
        let lesson: LessonDoc = serde_json::from_value(json).unwrap();
        assert_eq!(lesson.name, "");
        assert!(!lesson.is_markdown);
    }
}
