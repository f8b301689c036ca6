//! Desired-state payloads for a deploy.

use coursedb_catalog::{CourseDoc, LessonDoc};
use serde::{Deserialize, Serialize};

/// The desired state of one course: the course document plus its
/// full section/lesson tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    /// Course meta document, replaced wholesale.
    pub course: CourseDoc,
    /// Desired sections, each with its embedded lessons.
    pub sections: Vec<DesiredSection>,
}

/// One desired section with its embedded lesson list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesiredSection {
    /// Zero-based display index.
    ///
    /// Kept optional so a payload omitting it (or sending null) is
    /// rejected by validation with a message naming the section,
    /// instead of failing opaquely at deserialization.
    #[serde(default)]
    pub index: Option<u32>,
    /// Section title.
    #[serde(default)]
    pub title: String,
    /// Desired lessons under this section.
    #[serde(default)]
    pub lessons: Vec<DesiredLesson>,
}

/// One desired lesson, as embedded in a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesiredLesson {
    /// Lesson slug. Empty or missing slugs fail validation.
    #[serde(default)]
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
    /// Lesson body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Whether `body` is markdown.
    #[serde(default)]
    pub is_markdown: bool,
}

impl DesiredLesson {
    /// Materializes the lesson document for persistence, injecting
    /// the owning course slug and section index.
    pub(crate) fn into_doc(self, course_slug: &str, section_index: u32) -> LessonDoc {
        LessonDoc {
            course_slug: course_slug.to_string(),
            slug: self.slug,
            name: self.name,
            seo_title: self.seo_title,
            meta_description: self.meta_description,
            body: self.body,
            is_markdown: self.is_markdown,
            section_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_index_deserializes_as_none() {
        let json = serde_json::json!({ "index": null, "title": "Intro" });
        let section: DesiredSection = serde_json::from_value(json).unwrap();
        assert!(section.index.is_none());

        let json = serde_json::json!({ "title": "Intro" });
        let section: DesiredSection = serde_json::from_value(json).unwrap();
        assert!(section.index.is_none());
    }

    #[test]
    fn lesson_doc_injection() {
        let lesson = DesiredLesson {
            slug: "hello".into(),
            name: "Hello World".into(),
            seo_title: None,
            meta_description: None,
            body: Some("# Hi".into()),
            is_markdown: true,
        };
        let doc = lesson.into_doc("go-basics", 2);
        assert_eq!(doc.course_slug, "go-basics");
        assert_eq!(doc.section_index, 2);
        assert_eq!(doc.slug, "hello");
    }
}
