//! Error types for catalog services.

use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur in catalog services.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Underlying document-store error.
    #[error("store error: {0}")]
    Store(#[from] coursedb_store::StoreError),

    /// A referenced document does not exist.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing document.
        what: String,
    },
}

impl CatalogError {
    /// Creates a not-found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }
}
