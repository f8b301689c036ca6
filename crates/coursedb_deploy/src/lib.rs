//! # coursedb deploy
//!
//! The deploy reconciler: converges persisted course state to a
//! caller-supplied desired tree.
//!
//! A deploy is declarative. The caller sends the complete desired
//! state of one course (course document plus nested sections and
//! lessons) and the [`CourseReconciler`] diffs it against what the
//! store holds, applying inserts, updates, and deletes so the store
//! matches. Repeating a deploy converges: the second run performs no
//! structural changes.
//!
//! ```
//! use coursedb_deploy::{CourseReconciler, DeployRequest};
//! use coursedb_store::Store;
//!
//! let store = Store::in_memory();
//! let reconciler = CourseReconciler::new(store);
//!
//! let request: DeployRequest = serde_json::from_value(serde_json::json!({
//!     "course": { "slug": "go-basics", "title": "Go Basics" },
//!     "sections": [
//!         { "index": 0, "title": "Intro", "lessons": [
//!             { "slug": "hello", "name": "Hello World" }
//!         ] }
//!     ]
//! }))?;
//!
//! let report = reconciler.reconcile("go-basics", request)?;
//! assert_eq!(report.lessons.added.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod report;
mod request;

pub use config::DeployConfig;
pub use engine::CourseReconciler;
pub use error::{DeployError, DeployResult};
pub use report::{
    ActionCounts, ChangeReport, CourseAction, DeploySummary, LessonChange, LessonChanges,
    SectionAdded, SectionChanges, SectionRemoved, SectionUpdated,
};
pub use request::{DeployRequest, DesiredLesson, DesiredSection};
