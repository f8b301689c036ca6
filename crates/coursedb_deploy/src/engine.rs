//! The course reconciler.
//!
//! Converges the persisted `courses`, `sections`, and `lessons`
//! collections to a caller-supplied desired state, producing a change
//! report that enumerates every action taken.

use crate::config::DeployConfig;
use crate::error::{DeployError, DeployResult};
use crate::report::{
    ChangeReport, CourseAction, LessonChange, SectionAdded, SectionRemoved, SectionUpdated,
};
use crate::request::{DeployRequest, DesiredLesson};
use coursedb_catalog::{collections, CourseDoc, LessonDoc, SectionDoc};
use coursedb_store::Store;
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Time budget tracker for one reconcile call.
///
/// Checked between mutations; never interrupts a store call in
/// flight.
struct Deadline {
    expires_at: Instant,
}

impl Deadline {
    fn new(budget: Duration) -> Self {
        Self {
            expires_at: Instant::now() + budget,
        }
    }

    fn check(&self) -> DeployResult<()> {
        if Instant::now() >= self.expires_at {
            Err(DeployError::Timeout)
        } else {
            Ok(())
        }
    }
}

/// A desired section that passed validation.
struct ValidSection {
    index: u32,
    title: String,
    lessons: Vec<DesiredLesson>,
}

/// The course reconciler.
///
/// One reconciler serves the whole process; deploys for different
/// courses run concurrently, while overlapping deploys of the same
/// course are serialized by an advisory per-slug lock so the second
/// writer sees the first writer's state instead of a stale snapshot.
///
/// There is no transaction across phases: a store failure mid-deploy
/// leaves earlier mutations committed. Callers get an error, not a
/// partial report.
pub struct CourseReconciler {
    store: Store,
    config: DeployConfig,
    /// Advisory write locks for in-flight deploys, keyed by course
    /// slug.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CourseReconciler {
    /// Creates a reconciler with the default configuration.
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self::with_config(store, DeployConfig::default())
    }

    /// Creates a reconciler with an explicit configuration.
    #[must_use]
    pub fn with_config(store: Store, config: DeployConfig) -> Self {
        Self {
            store,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the advisory lock slot for a course.
    ///
    /// Slots no in-flight deploy still holds are evicted on the way,
    /// so the registry tracks active deploys rather than every slug
    /// ever deployed.
    fn lock_for(&self, slug: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks.retain(|_, slot| Arc::strong_count(slot) > 1);
        Arc::clone(locks.entry(slug.to_string()).or_default())
    }

    /// Reconciles the persisted state of `course_slug` to `request`.
    ///
    /// Validation happens before any mutation; an invalid request
    /// leaves the store untouched. On success the returned report
    /// enumerates every insert, update, and delete that was applied.
    pub fn reconcile(
        &self,
        course_slug: &str,
        request: DeployRequest,
    ) -> DeployResult<ChangeReport> {
        let (course, sections) = validate(course_slug, request)?;

        let slot = self.lock_for(course_slug);
        let _serialized = slot.lock();
        let deadline = Deadline::new(self.config.time_budget);

        // Phase 1: course upsert (always wholesale).
        deadline.check()?;
        let courses = self.store.collection::<CourseDoc>(collections::COURSES);
        let outcome = courses.replace_one(|c| c.slug == course_slug, &course, true)?;
        let mut report = ChangeReport::new(if outcome.was_upserted() {
            CourseAction::Created
        } else {
            CourseAction::Updated
        });

        // Phase 2: snapshot current state.
        let sections_col = self.store.collection::<SectionDoc>(collections::SECTIONS);
        let lessons_col = self.store.collection::<LessonDoc>(collections::LESSONS);
        let current_sections = sections_col.find(|s| s.course_slug == course_slug)?;
        let current_lessons = lessons_col.find(|l| l.course_slug == course_slug)?;

        // Phase 3: flatten the desired tree. The lesson map is keyed
        // by slug across all sections; a slug declared twice collapses
        // to the last-seen section (first-seen report position).
        let mut desired_indexes = BTreeSet::new();
        let mut lesson_order: Vec<String> = Vec::new();
        let mut desired_lessons: HashMap<String, LessonDoc> = HashMap::new();
        for section in &sections {
            desired_indexes.insert(section.index);
            for lesson in &section.lessons {
                let doc = lesson.clone().into_doc(course_slug, section.index);
                if desired_lessons.insert(doc.slug.clone(), doc).is_none() {
                    lesson_order.push(lesson.slug.clone());
                }
            }
        }
        debug!(
            course = course_slug,
            sections = sections.len(),
            lessons = lesson_order.len(),
            "desired state flattened"
        );

        // Phase 4: lesson sync, global and before section removal so
        // removals are attributed to sections that still exist.
        for slug in &lesson_order {
            deadline.check()?;
            let doc = &desired_lessons[slug];
            let change = LessonChange {
                slug: doc.slug.clone(),
                name: doc.name.clone(),
                section: doc.section_index,
            };
            if current_lessons.iter().any(|l| l.slug == *slug) {
                lessons_col.replace_one(
                    |l| l.course_slug == course_slug && l.slug == *slug,
                    doc,
                    false,
                )?;
                report.lessons.updated.push(change);
            } else {
                lessons_col.insert_one(doc)?;
                report.lessons.added.push(change);
            }
        }

        for current in &current_lessons {
            if desired_lessons.contains_key(&current.slug) {
                continue;
            }
            deadline.check()?;
            lessons_col
                .delete_one(|l| l.course_slug == course_slug && l.slug == current.slug)?;
            report.lessons.removed.push(LessonChange {
                slug: current.slug.clone(),
                name: current.name.clone(),
                section: current.section_index,
            });
        }

        // Phase 5: section sync.
        for section in &sections {
            match current_sections.iter().find(|s| s.index == section.index) {
                Some(existing) => {
                    if existing.title != section.title {
                        deadline.check()?;
                        sections_col.update_one(
                            |s| s.course_slug == course_slug && s.index == section.index,
                            |s| s.title = section.title.clone(),
                        )?;
                        report.sections.updated.push(SectionUpdated {
                            index: section.index,
                            old_title: existing.title.clone(),
                            new_title: section.title.clone(),
                        });
                    }
                }
                None => {
                    deadline.check()?;
                    sections_col.insert_one(&SectionDoc {
                        course_slug: course_slug.to_string(),
                        index: section.index,
                        title: section.title.clone(),
                    })?;
                    report.sections.added.push(SectionAdded {
                        index: section.index,
                        title: section.title.clone(),
                    });
                }
            }
        }

        // Undesired sections go last: their snapshot-time lessons are
        // deleted first, each removal re-recorded under the section
        // being dropped even when phase 4 already booked it. The
        // duplicate entries are the audit trail of why a lesson is
        // gone.
        for stale in current_sections
            .iter()
            .filter(|s| !desired_indexes.contains(&s.index))
        {
            for lesson in current_lessons
                .iter()
                .filter(|l| l.section_index == stale.index)
            {
                deadline.check()?;
                lessons_col
                    .delete_one(|l| l.course_slug == course_slug && l.slug == lesson.slug)?;
                report.lessons.removed.push(LessonChange {
                    slug: lesson.slug.clone(),
                    name: lesson.name.clone(),
                    section: stale.index,
                });
            }
            deadline.check()?;
            sections_col
                .delete_one(|s| s.course_slug == course_slug && s.index == stale.index)?;
            report.sections.removed.push(SectionRemoved {
                index: stale.index,
                title: stale.title.clone(),
            });
        }

        info!(
            course = course_slug,
            course_action = ?report.course,
            sections_added = report.sections.added.len(),
            sections_updated = report.sections.updated.len(),
            sections_removed = report.sections.removed.len(),
            lessons_added = report.lessons.added.len(),
            lessons_updated = report.lessons.updated.len(),
            lessons_removed = report.lessons.removed.len(),
            "deploy reconciled"
        );
        Ok(report)
    }
}

/// Validates a deploy request and normalizes its sections.
///
/// Runs entirely before any mutation. Duplicate lesson slugs across
/// sections are deliberately allowed (they collapse last-wins in
/// phase 3); duplicate section indexes are rejected because two
/// sections sharing an index would make ownership ambiguous.
fn validate(
    course_slug: &str,
    request: DeployRequest,
) -> DeployResult<(CourseDoc, Vec<ValidSection>)> {
    if request.course.slug.is_empty() {
        return Err(DeployError::validation("Course slug is required"));
    }
    if request.course.slug != course_slug {
        return Err(DeployError::validation(
            "Invalid course data or slug mismatch",
        ));
    }

    let mut seen_indexes = BTreeSet::new();
    let mut sections = Vec::with_capacity(request.sections.len());
    for section in request.sections {
        let Some(index) = section.index else {
            return Err(DeployError::validation(format!(
                "Section \"{}\" missing index",
                section.title
            )));
        };
        if !seen_indexes.insert(index) {
            return Err(DeployError::validation(format!(
                "Duplicate section index {index}"
            )));
        }
        for lesson in &section.lessons {
            if lesson.slug.is_empty() {
                return Err(DeployError::validation(format!(
                    "Lesson missing slug in section {index}"
                )));
            }
        }
        sections.push(ValidSection {
            index,
            title: section.title,
            lessons: section.lessons,
        });
    }

    Ok((request.course, sections))
}
