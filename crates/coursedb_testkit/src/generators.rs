//! Property-based test generators using proptest.

use coursedb_catalog::CourseDoc;
use coursedb_deploy::{DeployRequest, DesiredLesson, DesiredSection};
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Strategy for URL-safe slugs.
pub fn slug() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,14}"
}

/// Strategy for human-readable titles.
pub fn title() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ]{0,23}"
}

/// Strategy for a desired lesson.
pub fn desired_lesson() -> impl Strategy<Value = DesiredLesson> {
    (slug(), title(), any::<bool>()).prop_map(|(slug, name, is_markdown)| DesiredLesson {
        slug,
        name,
        seo_title: None,
        meta_description: None,
        body: None,
        is_markdown,
    })
}

/// Strategy for a list of desired sections with unique, possibly
/// gapped indexes.
pub fn desired_sections(max_sections: usize) -> impl Strategy<Value = Vec<DesiredSection>> {
    prop::collection::vec(
        (0u32..32, title(), prop::collection::vec(desired_lesson(), 0..4)),
        0..max_sections,
    )
    .prop_map(|raw| {
        let mut seen = BTreeSet::new();
        raw.into_iter()
            .filter(|(index, _, _)| seen.insert(*index))
            .map(|(index, title, lessons)| DesiredSection {
                index: Some(index),
                title,
                lessons,
            })
            .collect()
    })
}

/// Strategy for a full deploy request against a fixed course slug.
pub fn deploy_request(course_slug: &'static str) -> impl Strategy<Value = DeployRequest> {
    (title(), desired_sections(5)).prop_map(move |(course_title, sections)| DeployRequest {
        course: CourseDoc::new(course_slug, course_title),
        sections,
    })
}
