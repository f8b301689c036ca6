//! Curriculum assembly.
//!
//! Builds the nested section/lesson view of a course from the flat
//! `sections` and `lessons` collections.

use crate::documents::{collections, CourseDoc, LessonDoc, SectionDoc};
use crate::error::{CatalogError, CatalogResult};
use coursedb_store::Store;
use serde::{Deserialize, Serialize};

/// A lesson as it appears inside an assembled curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumLesson {
    /// Display name.
    pub name: String,
    /// Lesson slug.
    pub slug: String,
    /// SEO page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    /// SEO meta description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    /// Lesson body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Whether `body` is markdown.
    pub is_markdown: bool,
}

impl From<LessonDoc> for CurriculumLesson {
    fn from(doc: LessonDoc) -> Self {
        Self {
            name: doc.name,
            slug: doc.slug,
            seo_title: doc.seo_title,
            meta_description: doc.meta_description,
            body: doc.body,
            is_markdown: doc.is_markdown,
        }
    }
}

/// A section with its lessons, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumSection {
    /// Section title.
    pub title: String,
    /// Lessons under this section.
    pub lessons: Vec<CurriculumLesson>,
}

/// Fetches a course document, failing when it does not exist.
pub fn require_course(store: &Store, slug: &str) -> CatalogResult<CourseDoc> {
    store
        .collection::<CourseDoc>(collections::COURSES)
        .find_one(|c| c.slug == slug)?
        .ok_or_else(|| CatalogError::not_found("Course not found"))
}

/// Assembles the curriculum for a course.
///
/// Sections come back sorted by `index`; each carries the lessons
/// whose `section_index` matches. Lessons under an index with no
/// section document are dropped from the view (they are unreachable
/// on the site).
pub fn assemble(store: &Store, course_slug: &str) -> CatalogResult<Vec<CurriculumSection>> {
    let sections = store
        .collection::<SectionDoc>(collections::SECTIONS)
        .find_sorted(|s| s.course_slug == course_slug, |s| s.index)?;

    let lessons = store
        .collection::<LessonDoc>(collections::LESSONS)
        .find_sorted(|l| l.course_slug == course_slug, |l| l.section_index)?;

    Ok(sections
        .into_iter()
        .map(|sec| CurriculumSection {
            title: sec.title,
            lessons: lessons
                .iter()
                .filter(|l| l.section_index == sec.index)
                .cloned()
                .map(CurriculumLesson::from)
                .collect(),
        })
        .collect())
}
