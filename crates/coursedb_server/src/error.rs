//! Error types for the API layer.

use coursedb_catalog::CatalogError;
use coursedb_deploy::DeployError;
use serde::Serialize;
use thiserror::Error;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while handling an API request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload is malformed or missing required fields.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The publisher token is missing, malformed, or expired.
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// The addressed resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The deploy reconciler rejected or failed the request.
    #[error(transparent)]
    Deploy(#[from] DeployError),

    /// A catalog read or write failed, or named a missing document.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A store operation failed.
    #[error("store error: {0}")]
    Store(#[from] coursedb_store::StoreError),
}

impl ApiError {
    /// Creates an invalid-request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Creates a not-found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Returns true if the caller is at fault (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            ApiError::InvalidRequest(_) | ApiError::NotAuthorized(_) | ApiError::NotFound(_) => {
                true
            }
            ApiError::Deploy(err) => err.is_validation(),
            ApiError::Catalog(err) => matches!(err, CatalogError::NotFound { .. }),
            ApiError::Store(_) => false,
        }
    }

    /// HTTP status code a transport adapter should map this error to.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) => 400,
            ApiError::NotAuthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::Deploy(err) if err.is_validation() => 400,
            ApiError::Catalog(CatalogError::NotFound { .. }) => 404,
            ApiError::Deploy(_) | ApiError::Catalog(_) | ApiError::Store(_) => 500,
        }
    }

    /// The wire-format error body for this error.
    ///
    /// Client errors carry their message in `error`; internal failures
    /// are reported under a stable label with the cause in `details`.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::InvalidRequest(message) => ErrorBody::new(message.clone()),
            ApiError::NotAuthorized(message) => ErrorBody::new(message.clone()),
            ApiError::NotFound(message) => ErrorBody::new(message.clone()),
            ApiError::Deploy(DeployError::Validation { message }) => ErrorBody::new(message.clone()),
            ApiError::Deploy(err) => ErrorBody::with_details("Deployment failed", err.to_string()),
            ApiError::Catalog(CatalogError::NotFound { what }) => ErrorBody::new(what.clone()),
            ApiError::Catalog(err) => ErrorBody::with_details("Request failed", err.to_string()),
            ApiError::Store(err) => ErrorBody::with_details("Request failed", err.to_string()),
        }
    }
}

/// Wire-format error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Short error label or message.
    pub error: String,
    /// Underlying cause for internal failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(ApiError::invalid_request("bad").is_client_error());
        assert!(ApiError::not_found("Course not found").is_client_error());
        assert!(ApiError::Deploy(DeployError::validation("bad")).is_client_error());
        assert!(!ApiError::Deploy(DeployError::Timeout).is_client_error());
    }

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::invalid_request("bad").status_code(), 400);
        assert_eq!(ApiError::NotAuthorized("no token".into()).status_code(), 401);
        assert_eq!(ApiError::not_found("Course not found").status_code(), 404);
        assert_eq!(ApiError::Deploy(DeployError::Timeout).status_code(), 500);
    }

    #[test]
    fn deploy_failure_body() {
        let body = ApiError::Deploy(DeployError::Timeout).body();
        assert_eq!(body.error, "Deployment failed");
        assert!(body.details.is_some());
    }

    #[test]
    fn validation_body_names_field() {
        let body = ApiError::Deploy(DeployError::validation("Sections array is required")).body();
        assert_eq!(body.error, "Sections array is required");
        assert!(body.details.is_none());
    }
}
