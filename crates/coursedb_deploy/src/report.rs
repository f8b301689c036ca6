//! The change report: every action taken during one deploy.

use serde::{Deserialize, Serialize};

/// What happened to the course document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseAction {
    /// The course document did not exist and was created.
    Created,
    /// The course document existed and was replaced.
    Updated,
}

/// A section that was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionAdded {
    /// Section index.
    pub index: u32,
    /// Section title.
    pub title: String,
}

/// A section whose title changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionUpdated {
    /// Section index.
    pub index: u32,
    /// Title before the deploy.
    pub old_title: String,
    /// Title after the deploy.
    pub new_title: String,
}

/// A section that was removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRemoved {
    /// Section index.
    pub index: u32,
    /// Title at removal time.
    pub title: String,
}

/// Section-level actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionChanges {
    /// Sections inserted.
    pub added: Vec<SectionAdded>,
    /// Sections whose title changed. Unchanged titles produce no
    /// entry.
    pub updated: Vec<SectionUpdated>,
    /// Sections deleted.
    pub removed: Vec<SectionRemoved>,
}

/// One lesson-level action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonChange {
    /// Lesson slug.
    pub slug: String,
    /// Lesson display name.
    pub name: String,
    /// Owning section index. For removals this is the index the
    /// lesson was last persisted under.
    pub section: u32,
}

/// Lesson-level actions.
///
/// A lesson removed because its whole section was removed appears in
/// `removed` once per cause; duplicates are an intentional audit trail
/// of why the lesson is gone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonChanges {
    /// Lessons inserted.
    pub added: Vec<LessonChange>,
    /// Lessons replaced.
    pub updated: Vec<LessonChange>,
    /// Lessons deleted.
    pub removed: Vec<LessonChange>,
}

/// Structured record of every action taken during one deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReport {
    /// Action on the course document.
    pub course: CourseAction,
    /// Section actions.
    pub sections: SectionChanges,
    /// Lesson actions.
    pub lessons: LessonChanges,
}

impl ChangeReport {
    /// Creates a report with the given course action and no other
    /// changes yet.
    #[must_use]
    pub fn new(course: CourseAction) -> Self {
        Self {
            course,
            sections: SectionChanges::default(),
            lessons: LessonChanges::default(),
        }
    }

    /// Returns true if nothing beyond the course upsert happened.
    #[must_use]
    pub fn is_noop_beyond_course(&self) -> bool {
        self.sections.added.is_empty()
            && self.sections.updated.is_empty()
            && self.sections.removed.is_empty()
            && self.lessons.added.is_empty()
            && self.lessons.updated.is_empty()
            && self.lessons.removed.is_empty()
    }

    /// Builds the caller-facing summary.
    ///
    /// `section_total` and `lesson_total` are the desired counts from
    /// the request (lesson lists summed as sent, duplicates included).
    #[must_use]
    pub fn summary(&self, section_total: usize, lesson_total: usize) -> DeploySummary {
        DeploySummary {
            course: self.course,
            sections: ActionCounts {
                total: section_total,
                added: self.sections.added.len(),
                updated: self.sections.updated.len(),
                removed: self.sections.removed.len(),
            },
            lessons: ActionCounts {
                total: lesson_total,
                added: self.lessons.added.len(),
                updated: self.lessons.updated.len(),
                removed: self.lessons.removed.len(),
            },
        }
    }
}

/// Desired totals vs. counted actions for one document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCounts {
    /// Desired count from the request.
    pub total: usize,
    /// Number of add actions.
    pub added: usize,
    /// Number of update actions.
    pub updated: usize,
    /// Number of remove actions.
    pub removed: usize,
}

/// Roll-up of a change report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploySummary {
    /// Action on the course document.
    pub course: CourseAction,
    /// Section counts.
    pub sections: ActionCounts,
    /// Lesson counts.
    pub lessons: ActionCounts,
}
