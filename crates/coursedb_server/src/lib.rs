//! # coursedb server
//!
//! Transport-agnostic API handlers for the course platform.
//!
//! The crate exposes a [`RequestHandler`] whose methods mirror the
//! platform's endpoints: course deploys, course/section/lesson
//! authoring, curriculum reads, category ordering, and subscriber
//! access. Handlers take typed payloads and return typed responses;
//! an HTTP adapter maps them onto routes and turns [`ApiError`] into
//! a status code via [`ApiError::status_code`] and a body via
//! [`ApiError::body`].
//!
//! Write endpoints are gated by HMAC-SHA256 publisher tokens when
//! auth is enabled in [`ServerConfig`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod config;
mod error;
mod handlers;
mod responses;

pub use auth::TokenValidator;
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, ErrorBody};
pub use handlers::{ApiContext, RequestHandler, SectionUpsert, SuggestionRequest};
pub use responses::{
    AccessResponse, AckResponse, CategoryOrderResponse, CourseDetailResponse, CourseListResponse,
    CourseRef, CourseSummary, CourseUpsertResponse, CurriculumResponse, DeployResponse, LessonRef,
    LessonUpsertResponse, LessonViewResponse, SectionRef, SectionUpsertResponse, UpsertAction,
};
