//! Wire-format response types for the API handlers.

use coursedb_catalog::{CourseDoc, CurriculumSection, LessonDoc, SectionDoc};
use coursedb_deploy::{ChangeReport, DeploySummary};
use serde::{Deserialize, Serialize};

/// Response to a deploy request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployResponse {
    /// Always true on a 2xx response.
    pub success: bool,
    /// Display title of the deployed course.
    pub course: String,
    /// Every action the reconciler took.
    pub changes: ChangeReport,
    /// Desired totals vs. counted actions.
    pub summary: DeploySummary,
}

/// One course on the listing page.
///
/// Heavy authoring fields are stripped; the category color is derived
/// server-side so all clients render the same palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    /// The course document, minus heavy fields.
    #[serde(flatten)]
    pub course: CourseDoc,
    /// Deterministic color for the course's category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_color: Option<String>,
}

/// Response to a course listing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseListResponse {
    /// All courses, listing view.
    pub courses: Vec<CourseSummary>,
}

/// A single course with its assembled curriculum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDetailResponse {
    /// The full course document.
    #[serde(flatten)]
    pub course: CourseDoc,
    /// Nested section/lesson view.
    pub curriculum: Vec<CurriculumSection>,
}

/// Response to a curriculum-only request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumResponse {
    /// Nested section/lesson view.
    pub curriculum: Vec<CurriculumSection>,
    /// Course display title.
    pub title: String,
}

/// Whether an upsert created or replaced the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    /// The document did not exist.
    Created,
    /// The document was replaced.
    Updated,
}

/// Slug and title of an upserted course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRef {
    /// Course slug.
    pub slug: String,
    /// Course title.
    pub title: String,
}

/// Response to a course upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseUpsertResponse {
    /// Always true on a 2xx response.
    pub success: bool,
    /// Whether the course was created or updated.
    pub action: UpsertAction,
    /// The upserted course.
    pub course: CourseRef,
}

/// Index and title of an upserted section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRef {
    /// Section index.
    pub index: u32,
    /// Section title.
    pub title: String,
}

/// Response to a section upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionUpsertResponse {
    /// Always true on a 2xx response.
    pub success: bool,
    /// Whether the section was created or updated.
    pub action: UpsertAction,
    /// The upserted section.
    pub section: SectionRef,
}

/// Slug and name of an upserted lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonRef {
    /// Lesson slug.
    pub slug: String,
    /// Lesson display name.
    pub name: String,
}

/// Response to a lesson upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonUpsertResponse {
    /// Always true on a 2xx response.
    pub success: bool,
    /// Whether the lesson was created or updated.
    pub action: UpsertAction,
    /// The upserted lesson.
    pub lesson: LessonRef,
}

/// Response to a single-lesson lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonViewResponse {
    /// The lesson document.
    pub lesson: LessonDoc,
    /// The owning section, when it exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionDoc>,
    /// Index of the owning section.
    pub section_index: u32,
    /// Slug of the owning course.
    pub course_slug: String,
    /// Title of the owning course, empty if the course is gone.
    pub course_title: String,
}

/// Response carrying the homepage category order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryOrderResponse {
    /// Category names in display order.
    pub order: Vec<String>,
}

/// Response to an access check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessResponse {
    /// Whether the email holds a universal grant.
    pub has_access: bool,
}

/// Generic success acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    /// Always true on a 2xx response.
    pub success: bool,
}

impl AckResponse {
    /// A positive acknowledgement.
    #[must_use]
    pub fn ok() -> Self {
        Self { success: true }
    }
}
