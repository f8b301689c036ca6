//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up test stores and
//! common course trees.

use coursedb_catalog::{collections, CourseDoc, LessonDoc, SectionDoc};
use coursedb_store::{SnapshotBackend, Store};
use std::path::PathBuf;
use tempfile::TempDir;

/// A test store with automatic cleanup.
pub struct TestStore {
    /// The store handle.
    pub store: Store,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
    path: Option<PathBuf>,
}

impl TestStore {
    /// Creates a new in-memory test store.
    pub fn memory() -> Self {
        Self {
            store: Store::in_memory(),
            _temp_dir: None,
            path: None,
        }
    }

    /// Creates a new snapshot-backed test store in a temp directory.
    pub fn snapshot() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("courses.cdb");
        let backend = SnapshotBackend::open(&path).expect("Failed to open snapshot backend");
        let store = Store::open(Box::new(backend)).expect("Failed to open store");
        Self {
            store,
            _temp_dir: Some(temp_dir),
            path: Some(path),
        }
    }

    /// Returns the snapshot path, None if in-memory.
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

impl std::ops::Deref for TestStore {
    type Target = Store;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Runs a test with a fresh in-memory store.
pub fn with_store<F: FnOnce(Store)>(f: F) {
    f(Store::in_memory());
}

/// Seeds a store with a small known course tree.
///
/// The `go-basics` course has two sections (Intro at 0, Control Flow
/// at 1) with two and one lessons respectively.
pub fn seed_go_basics(store: &Store) {
    store
        .collection::<CourseDoc>(collections::COURSES)
        .insert_one(&CourseDoc::new("go-basics", "Go Basics"))
        .expect("seed course");

    let sections = store.collection::<SectionDoc>(collections::SECTIONS);
    for (index, title) in [(0, "Intro"), (1, "Control Flow")] {
        sections
            .insert_one(&SectionDoc {
                course_slug: "go-basics".into(),
                index,
                title: title.into(),
            })
            .expect("seed section");
    }

    let lessons = store.collection::<LessonDoc>(collections::LESSONS);
    for (slug, name, section_index) in [
        ("hello", "Hello World", 0),
        ("vars", "Variables", 0),
        ("loops", "Loops", 1),
    ] {
        lessons
            .insert_one(&LessonDoc {
                course_slug: "go-basics".into(),
                slug: slug.into(),
                name: name.into(),
                seo_title: None,
                meta_description: None,
                body: Some(format!("# {name}")),
                is_markdown: true,
                section_index,
            })
            .expect("seed lesson");
    }
}

/// A deploy payload matching the [`seed_go_basics`] tree.
pub fn go_basics_deploy_body() -> serde_json::Value {
    serde_json::json!({
        "course": { "slug": "go-basics", "title": "Go Basics" },
        "sections": [
            { "index": 0, "title": "Intro", "lessons": [
                { "slug": "hello", "name": "Hello World", "body": "# Hello World", "isMarkdown": true },
                { "slug": "vars", "name": "Variables", "body": "# Variables", "isMarkdown": true }
            ] },
            { "index": 1, "title": "Control Flow", "lessons": [
                { "slug": "loops", "name": "Loops", "body": "# Loops", "isMarkdown": true }
            ] }
        ]
    })
}
