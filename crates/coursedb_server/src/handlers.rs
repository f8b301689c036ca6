//! Request handlers for the course platform API.
//!
//! Handlers are transport-agnostic: they take typed (or, for deploy,
//! raw JSON) payloads and return typed responses or an [`ApiError`]
//! the transport adapter maps to a status code and body.

use crate::auth::TokenValidator;
use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};
use crate::responses::{
    AccessResponse, AckResponse, CategoryOrderResponse, CourseDetailResponse, CourseListResponse,
    CourseRef, CourseSummary, CourseUpsertResponse, CurriculumResponse, DeployResponse, LessonRef,
    LessonUpsertResponse, LessonViewResponse, SectionRef, SectionUpsertResponse, UpsertAction,
};
use coursedb_catalog::{
    assemble, category_color, category_order, collections, require_course, set_category_order,
    AccessControl, CourseDoc, LessonDoc, SectionDoc, UNIVERSAL_SCOPE,
};
use coursedb_deploy::{CourseReconciler, DeployRequest};
use coursedb_store::Store;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared state for request handling.
pub struct ApiContext {
    /// Server configuration.
    pub config: ServerConfig,
    store: Store,
    reconciler: CourseReconciler,
    access: AccessControl,
    validator: Option<TokenValidator>,
}

impl ApiContext {
    /// Creates a context over a store handle.
    pub fn new(store: Store, config: ServerConfig) -> Self {
        let validator = config
            .auth_secret
            .clone()
            .map(|secret| TokenValidator::new(secret, config.token_expiry));
        let reconciler = CourseReconciler::with_config(store.clone(), config.deploy.clone());
        let access = AccessControl::new(store.clone());
        Self {
            config,
            store,
            reconciler,
            access,
            validator,
        }
    }
}

/// Payload for a section upsert.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionUpsert {
    /// Section title.
    #[serde(default)]
    pub title: String,
    /// Target index. Appends after the last section when absent.
    #[serde(default)]
    pub index: Option<u32>,
}

/// Payload for a course suggestion.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionRequest {
    /// Submitter email, optional.
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form suggestion text.
    #[serde(default)]
    pub text: String,
}

/// Handler for API requests.
pub struct RequestHandler {
    context: Arc<ApiContext>,
}

impl RequestHandler {
    /// Creates a handler over a shared context.
    pub fn new(context: Arc<ApiContext>) -> Self {
        Self { context }
    }

    /// Checks the publisher token on a write endpoint.
    fn authorize(&self, token: Option<&[u8]>) -> ApiResult<()> {
        if !self.context.config.require_auth {
            return Ok(());
        }
        let Some(validator) = &self.context.validator else {
            return Err(ApiError::NotAuthorized("Auth not configured".into()));
        };
        let Some(token) = token else {
            return Err(ApiError::NotAuthorized("Missing publisher token".into()));
        };
        let subject = validator.validate(token)?;
        debug!(subject, "publisher authorized");
        Ok(())
    }

    /// Handles a course deploy.
    ///
    /// The body is taken raw so shape problems surface as the
    /// messages authoring tools already know, before any typed
    /// deserialization.
    pub fn handle_deploy(
        &self,
        slug: &str,
        token: Option<&[u8]>,
        body: serde_json::Value,
    ) -> ApiResult<DeployResponse> {
        self.authorize(token)?;

        let course_slug = body
            .get("course")
            .and_then(|c| c.get("slug"))
            .and_then(|s| s.as_str());
        if course_slug != Some(slug) {
            return Err(ApiError::invalid_request(
                "Invalid course data or slug mismatch",
            ));
        }
        if !body.get("sections").is_some_and(|s| s.is_array()) {
            return Err(ApiError::invalid_request("Sections array is required"));
        }

        let request: DeployRequest = serde_json::from_value(body)
            .map_err(|e| ApiError::invalid_request(format!("Malformed deploy payload: {e}")))?;

        let section_total = request.sections.len();
        let lesson_total: usize = request.sections.iter().map(|s| s.lessons.len()).sum();
        let course_title = request.course.title.clone();

        let report = self.context.reconciler.reconcile(slug, request)?;
        let summary = report.summary(section_total, lesson_total);
        info!(course = slug, "deploy handled");

        Ok(DeployResponse {
            success: true,
            course: course_title,
            changes: report,
            summary,
        })
    }

    /// Lists all courses for the homepage.
    ///
    /// Heavy authoring fields are stripped from each document and a
    /// deterministic category color is attached.
    pub fn list_courses(&self) -> ApiResult<CourseListResponse> {
        let courses = self
            .context
            .store
            .collection::<CourseDoc>(collections::COURSES)
            .find_sorted(|_| true, |c| c.slug.clone())?;

        let courses = courses
            .into_iter()
            .map(|mut course| {
                course.description = None;
                course.what_youll_learn = Vec::new();
                let category_color = course
                    .category
                    .as_deref()
                    .map(|name| category_color(name).to_string());
                CourseSummary {
                    course,
                    category_color,
                }
            })
            .collect();

        Ok(CourseListResponse { courses })
    }

    /// Fetches one course with its assembled curriculum.
    pub fn get_course(&self, slug: &str) -> ApiResult<CourseDetailResponse> {
        let course = require_course(&self.context.store, slug)?;
        let curriculum = assemble(&self.context.store, slug)?;
        Ok(CourseDetailResponse { course, curriculum })
    }

    /// Fetches the curriculum view of one course.
    pub fn get_curriculum(&self, slug: &str) -> ApiResult<CurriculumResponse> {
        let course = require_course(&self.context.store, slug)?;
        let curriculum = assemble(&self.context.store, slug)?;
        Ok(CurriculumResponse {
            curriculum,
            title: course.title,
        })
    }

    /// Creates or replaces a course meta document.
    pub fn upsert_course(
        &self,
        token: Option<&[u8]>,
        course: CourseDoc,
    ) -> ApiResult<CourseUpsertResponse> {
        self.authorize(token)?;
        if course.slug.is_empty() {
            return Err(ApiError::invalid_request("Course slug is required"));
        }

        let outcome = self
            .context
            .store
            .collection::<CourseDoc>(collections::COURSES)
            .replace_one(|c| c.slug == course.slug, &course, true)?;

        Ok(CourseUpsertResponse {
            success: true,
            action: if outcome.was_upserted() {
                UpsertAction::Created
            } else {
                UpsertAction::Updated
            },
            course: CourseRef {
                slug: course.slug,
                title: course.title,
            },
        })
    }

    /// Deletes a course meta document.
    ///
    /// Sections and lessons are left in place; a later deploy or an
    /// explicit cleanup removes them.
    pub fn delete_course(&self, token: Option<&[u8]>, slug: &str) -> ApiResult<AckResponse> {
        self.authorize(token)?;
        let deleted = self
            .context
            .store
            .collection::<CourseDoc>(collections::COURSES)
            .delete_one(|c| c.slug == slug)?;
        if deleted == 0 {
            return Err(ApiError::not_found("Course not found"));
        }
        Ok(AckResponse::ok())
    }

    /// Creates or retitles a single section.
    ///
    /// Without an index the section is appended. Inserting at an
    /// occupied position that is not the section's own shifts that
    /// section and everything after it up by one.
    pub fn upsert_section(
        &self,
        token: Option<&[u8]>,
        course_slug: &str,
        payload: SectionUpsert,
    ) -> ApiResult<SectionUpsertResponse> {
        self.authorize(token)?;
        if payload.title.is_empty() {
            return Err(ApiError::invalid_request("Title is required"));
        }

        let sections = self
            .context
            .store
            .collection::<SectionDoc>(collections::SECTIONS);
        let total = sections.count(|s| s.course_slug == course_slug)?;
        let index = match payload.index {
            Some(index) => index,
            None => total as u32,
        };

        let existing = sections.find_one(|s| s.course_slug == course_slug && s.index == index)?;
        let action = if existing.is_some() {
            sections.update_one(
                |s| s.course_slug == course_slug && s.index == index,
                |s| s.title = payload.title.clone(),
            )?;
            UpsertAction::Updated
        } else {
            if u64::from(index) < total {
                sections.update_many(
                    |s| s.course_slug == course_slug && s.index >= index,
                    |s| s.index += 1,
                )?;
            }
            sections.insert_one(&SectionDoc {
                course_slug: course_slug.to_string(),
                index,
                title: payload.title.clone(),
            })?;
            UpsertAction::Created
        };

        Ok(SectionUpsertResponse {
            success: true,
            action,
            section: SectionRef {
                index,
                title: payload.title,
            },
        })
    }

    /// Fetches one lesson with its owning section and course title.
    pub fn get_lesson(&self, lesson_slug: &str) -> ApiResult<LessonViewResponse> {
        let lesson = self
            .context
            .store
            .collection::<LessonDoc>(collections::LESSONS)
            .find_one(|l| l.slug == lesson_slug)?
            .ok_or_else(|| ApiError::not_found("Lesson not found"))?;

        let section = self
            .context
            .store
            .collection::<SectionDoc>(collections::SECTIONS)
            .find_one(|s| {
                s.course_slug == lesson.course_slug && s.index == lesson.section_index
            })?;
        let course = self
            .context
            .store
            .collection::<CourseDoc>(collections::COURSES)
            .find_one(|c| c.slug == lesson.course_slug)?;

        Ok(LessonViewResponse {
            section_index: lesson.section_index,
            course_slug: lesson.course_slug.clone(),
            course_title: course.map(|c| c.title).unwrap_or_default(),
            section,
            lesson,
        })
    }

    /// Creates or replaces a single lesson under a section.
    pub fn upsert_lesson(
        &self,
        token: Option<&[u8]>,
        course_slug: &str,
        section_index: u32,
        mut lesson: LessonDoc,
    ) -> ApiResult<LessonUpsertResponse> {
        self.authorize(token)?;
        if lesson.slug.is_empty() {
            return Err(ApiError::invalid_request("Lesson slug is required"));
        }
        lesson.course_slug = course_slug.to_string();
        lesson.section_index = section_index;

        let outcome = self
            .context
            .store
            .collection::<LessonDoc>(collections::LESSONS)
            .replace_one(
                |l| l.course_slug == course_slug && l.slug == lesson.slug,
                &lesson,
                true,
            )?;

        Ok(LessonUpsertResponse {
            success: true,
            action: if outcome.was_upserted() {
                UpsertAction::Created
            } else {
                UpsertAction::Updated
            },
            lesson: LessonRef {
                slug: lesson.slug,
                name: lesson.name,
            },
        })
    }

    /// Deletes a single lesson.
    pub fn delete_lesson(
        &self,
        token: Option<&[u8]>,
        course_slug: &str,
        lesson_slug: &str,
    ) -> ApiResult<AckResponse> {
        self.authorize(token)?;
        let deleted = self
            .context
            .store
            .collection::<LessonDoc>(collections::LESSONS)
            .delete_one(|l| l.course_slug == course_slug && l.slug == lesson_slug)?;
        if deleted == 0 {
            return Err(ApiError::not_found("Lesson not found"));
        }
        Ok(AckResponse::ok())
    }

    /// Returns the homepage category order.
    pub fn get_category_order(&self) -> ApiResult<CategoryOrderResponse> {
        let order = category_order(&self.context.store)?;
        Ok(CategoryOrderResponse { order })
    }

    /// Replaces the homepage category order.
    pub fn set_category_order(
        &self,
        token: Option<&[u8]>,
        order: Vec<String>,
    ) -> ApiResult<AckResponse> {
        self.authorize(token)?;
        set_category_order(&self.context.store, order)?;
        Ok(AckResponse::ok())
    }

    /// Records an email subscription under the universal scope.
    pub fn subscribe(&self, email: &str, scope: Option<&str>) -> ApiResult<AckResponse> {
        if email.is_empty() {
            return Err(ApiError::invalid_request("Missing email"));
        }
        let scope = scope.unwrap_or(UNIVERSAL_SCOPE);
        self.context.access.subscribe(email, scope)?;
        Ok(AckResponse::ok())
    }

    /// Checks whether an email unlocks gated lessons.
    pub fn verify_access(&self, email: &str) -> ApiResult<AccessResponse> {
        let has_access = self.context.access.has_access(email)?;
        Ok(AccessResponse { has_access })
    }

    /// Stores a course suggestion.
    pub fn suggest(&self, request: SuggestionRequest) -> ApiResult<AckResponse> {
        self.context
            .access
            .record_suggestion(request.email, &request.text)?;
        Ok(AckResponse::ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn handler() -> RequestHandler {
        let context = Arc::new(ApiContext::new(Store::in_memory(), ServerConfig::default()));
        RequestHandler::new(context)
    }

    fn authed_handler() -> (RequestHandler, Vec<u8>) {
        let config = ServerConfig::new().with_auth(b"publisher-secret".to_vec());
        let context = Arc::new(ApiContext::new(Store::in_memory(), config.clone()));
        let validator = TokenValidator::new(
            config.auth_secret.clone().unwrap(),
            config.token_expiry,
        );
        let token = validator.mint("authoring-cli").unwrap();
        (RequestHandler::new(context), token)
    }

    fn deploy_body() -> serde_json::Value {
        json!({
            "course": { "slug": "go-basics", "title": "Go Basics" },
            "sections": [
                { "index": 0, "title": "Intro", "lessons": [
                    { "slug": "hello", "name": "Hello World" }
                ] }
            ]
        })
    }

    #[test]
    fn deploy_happy_path() {
        let handler = handler();
        let response = handler
            .handle_deploy("go-basics", None, deploy_body())
            .unwrap();

        assert!(response.success);
        assert_eq!(response.course, "Go Basics");
        assert_eq!(response.changes.lessons.added.len(), 1);
        assert_eq!(response.summary.sections.total, 1);
        assert_eq!(response.summary.lessons.total, 1);
    }

    #[test]
    fn deploy_slug_mismatch() {
        let handler = handler();
        let err = handler
            .handle_deploy("other-course", None, deploy_body())
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.body().error, "Invalid course data or slug mismatch");
    }

    #[test]
    fn deploy_requires_sections_array() {
        let handler = handler();
        let body = json!({ "course": { "slug": "go-basics", "title": "Go Basics" } });
        let err = handler.handle_deploy("go-basics", None, body).unwrap_err();
        assert_eq!(err.body().error, "Sections array is required");

        let body = json!({
            "course": { "slug": "go-basics" },
            "sections": "not-an-array"
        });
        let err = handler.handle_deploy("go-basics", None, body).unwrap_err();
        assert_eq!(err.body().error, "Sections array is required");
    }

    #[test]
    fn deploy_requires_token_when_auth_enabled() {
        let (handler, token) = authed_handler();

        let err = handler
            .handle_deploy("go-basics", None, deploy_body())
            .unwrap_err();
        assert_eq!(err.status_code(), 401);

        let response = handler
            .handle_deploy("go-basics", Some(&token), deploy_body())
            .unwrap();
        assert!(response.success);
    }

    #[test]
    fn course_listing_strips_heavy_fields() {
        let handler = handler();
        let mut course = CourseDoc::new("go-basics", "Go Basics");
        course.description = Some("Very long".into());
        course.what_youll_learn = vec!["Go".into()];
        course.category = Some("languages".into());
        handler.upsert_course(None, course).unwrap();

        let listing = handler.list_courses().unwrap();
        assert_eq!(listing.courses.len(), 1);
        assert!(listing.courses[0].course.description.is_none());
        assert!(listing.courses[0].course.what_youll_learn.is_empty());
        assert_eq!(
            listing.courses[0].category_color.as_deref(),
            Some(category_color("languages"))
        );
    }

    #[test]
    fn course_detail_includes_curriculum() {
        let handler = handler();
        handler
            .handle_deploy("go-basics", None, deploy_body())
            .unwrap();

        let detail = handler.get_course("go-basics").unwrap();
        assert_eq!(detail.course.slug, "go-basics");
        assert_eq!(detail.curriculum.len(), 1);
        assert_eq!(detail.curriculum[0].lessons[0].slug, "hello");

        let curriculum = handler.get_curriculum("go-basics").unwrap();
        assert_eq!(curriculum.title, "Go Basics");

        assert_eq!(
            handler.get_course("missing").unwrap_err().status_code(),
            404
        );
    }

    #[test]
    fn course_upsert_and_delete() {
        let handler = handler();

        let response = handler
            .upsert_course(None, CourseDoc::new("go-basics", "Go Basics"))
            .unwrap();
        assert_eq!(response.action, UpsertAction::Created);

        let response = handler
            .upsert_course(None, CourseDoc::new("go-basics", "Go, Fast"))
            .unwrap();
        assert_eq!(response.action, UpsertAction::Updated);

        handler.delete_course(None, "go-basics").unwrap();
        let err = handler.delete_course(None, "go-basics").unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn empty_course_slug_rejected() {
        let handler = handler();
        let err = handler
            .upsert_course(None, CourseDoc::new("", "No Slug"))
            .unwrap_err();
        assert_eq!(err.body().error, "Course slug is required");
    }

    #[test]
    fn section_insert_shifts_following() {
        let handler = handler();
        for (index, title) in [(0, "A"), (1, "B")] {
            handler
                .upsert_section(
                    None,
                    "go-basics",
                    SectionUpsert {
                        title: title.into(),
                        index: Some(index),
                    },
                )
                .unwrap();
        }

        // Insert at 0: A and B shift to 1 and 2
        let response = handler
            .upsert_section(
                None,
                "go-basics",
                SectionUpsert {
                    title: "New First".into(),
                    index: Some(0),
                },
            )
            .unwrap();
        assert_eq!(response.action, UpsertAction::Created);

        let curriculum = {
            handler
                .upsert_course(None, CourseDoc::new("go-basics", "Go Basics"))
                .unwrap();
            handler.get_curriculum("go-basics").unwrap()
        };
        let titles: Vec<_> = curriculum
            .curriculum
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["New First", "A", "B"]);
    }

    #[test]
    fn section_without_index_appends() {
        let handler = handler();
        let response = handler
            .upsert_section(
                None,
                "go-basics",
                SectionUpsert {
                    title: "First".into(),
                    index: None,
                },
            )
            .unwrap();
        assert_eq!(response.section.index, 0);

        let response = handler
            .upsert_section(
                None,
                "go-basics",
                SectionUpsert {
                    title: "Second".into(),
                    index: None,
                },
            )
            .unwrap();
        assert_eq!(response.section.index, 1);
    }

    #[test]
    fn section_at_existing_index_retitles() {
        let handler = handler();
        handler
            .upsert_section(
                None,
                "go-basics",
                SectionUpsert {
                    title: "Old".into(),
                    index: Some(0),
                },
            )
            .unwrap();

        let response = handler
            .upsert_section(
                None,
                "go-basics",
                SectionUpsert {
                    title: "New".into(),
                    index: Some(0),
                },
            )
            .unwrap();
        assert_eq!(response.action, UpsertAction::Updated);
    }

    #[test]
    fn lesson_lookup_and_lifecycle() {
        let handler = handler();
        handler
            .handle_deploy("go-basics", None, deploy_body())
            .unwrap();

        let view = handler.get_lesson("hello").unwrap();
        assert_eq!(view.course_slug, "go-basics");
        assert_eq!(view.course_title, "Go Basics");
        assert_eq!(view.section.as_ref().map(|s| s.title.as_str()), Some("Intro"));

        let mut lesson = view.lesson.clone();
        lesson.name = "Hello, World!".into();
        let response = handler
            .upsert_lesson(None, "go-basics", 0, lesson)
            .unwrap();
        assert_eq!(response.action, UpsertAction::Updated);

        handler.delete_lesson(None, "go-basics", "hello").unwrap();
        let err = handler
            .delete_lesson(None, "go-basics", "hello")
            .unwrap_err();
        assert_eq!(err.body().error, "Lesson not found");
    }

    #[test]
    fn lesson_upsert_requires_slug() {
        let handler = handler();
        let lesson = LessonDoc {
            course_slug: String::new(),
            slug: String::new(),
            name: "Anonymous".into(),
            seo_title: None,
            meta_description: None,
            body: None,
            is_markdown: false,
            section_index: 0,
        };
        let err = handler
            .upsert_lesson(None, "go-basics", 0, lesson)
            .unwrap_err();
        assert_eq!(err.body().error, "Lesson slug is required");
    }

    #[test]
    fn category_order_roundtrip() {
        let handler = handler();
        assert_eq!(handler.get_category_order().unwrap().order, vec!["all"]);

        handler
            .set_category_order(None, vec!["devops".into(), "go".into()])
            .unwrap();
        assert_eq!(
            handler.get_category_order().unwrap().order,
            vec!["devops", "go"]
        );
    }

    #[test]
    fn subscription_flow() {
        let handler = handler();

        assert!(!handler.verify_access("a@example.com").unwrap().has_access);
        assert!(!handler.verify_access("").unwrap().has_access);

        let err = handler.subscribe("", None).unwrap_err();
        assert_eq!(err.body().error, "Missing email");

        handler.subscribe("a@example.com", None).unwrap();
        assert!(handler.verify_access("a@example.com").unwrap().has_access);
    }

    #[test]
    fn suggestions_accepted() {
        let handler = handler();
        let response = handler
            .suggest(SuggestionRequest {
                email: Some("a@example.com".into()),
                text: "Terraform deep dive".into(),
            })
            .unwrap();
        assert!(response.success);
    }
}
