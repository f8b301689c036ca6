//! Cross-crate integration: deploy through the API handlers onto a
//! snapshot-backed store, then read back through a fresh handle.

use coursedb_server::{ApiContext, RequestHandler, ServerConfig, UpsertAction};
use coursedb_store::{SnapshotBackend, Store};
use coursedb_testkit::fixtures::{go_basics_deploy_body, TestStore};
use std::sync::Arc;

fn handler_over(store: Store) -> RequestHandler {
    RequestHandler::new(Arc::new(ApiContext::new(store, ServerConfig::default())))
}

#[test]
fn deploy_and_read_back_through_new_handle() {
    let test = TestStore::snapshot();

    {
        let handler = handler_over(test.store.clone());
        handler
            .handle_deploy("go-basics", None, go_basics_deploy_body())
            .unwrap();
    }

    // A second handler over a clone of the same store sees the data
    let handler = handler_over(test.store.clone());
    let detail = handler.get_course("go-basics").unwrap();
    assert_eq!(detail.curriculum.len(), 2);
    assert_eq!(detail.curriculum[0].lessons.len(), 2);
    assert_eq!(detail.curriculum[1].lessons[0].slug, "loops");
}

#[test]
fn snapshot_reload_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("courses.cdb");

    {
        let backend = SnapshotBackend::open(&path).unwrap();
        let store = Store::open(Box::new(backend)).unwrap();
        let handler = handler_over(store);
        handler
            .handle_deploy("go-basics", None, go_basics_deploy_body())
            .unwrap();
    }

    let backend = SnapshotBackend::open(&path).unwrap();
    let store = Store::open(Box::new(backend)).unwrap();
    let handler = handler_over(store);

    let curriculum = handler.get_curriculum("go-basics").unwrap();
    assert_eq!(curriculum.title, "Go Basics");
    assert_eq!(curriculum.curriculum.len(), 2);

    // Authoring edits work on the reloaded store too
    let response = handler
        .upsert_lesson(
            None,
            "go-basics",
            0,
            coursedb_catalog::LessonDoc {
                course_slug: String::new(),
                slug: "hello".into(),
                name: "Hello Again".into(),
                seo_title: None,
                meta_description: None,
                body: None,
                is_markdown: false,
                section_index: 0,
            },
        )
        .unwrap();
    assert_eq!(response.action, UpsertAction::Updated);
}
