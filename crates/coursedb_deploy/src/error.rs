//! Error types for deploy reconciliation.

use thiserror::Error;

/// Result type for deploy operations.
pub type DeployResult<T> = Result<T, DeployError>;

/// Errors that can occur during a deploy.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The desired state is structurally invalid.
    ///
    /// Raised before any mutation; the store is untouched.
    #[error("invalid deploy request: {message}")]
    Validation {
        /// Human-readable message naming the offending field.
        message: String,
    },

    /// A store operation failed mid-reconciliation.
    ///
    /// Mutations applied before the failure remain committed; there is
    /// no rollback.
    #[error("deployment failed: {0}")]
    Store(#[from] coursedb_store::StoreError),

    /// The deploy exceeded its time budget.
    ///
    /// Checked between mutations, so partially applied phases remain
    /// committed like any other mid-flight failure.
    #[error("deployment timed out")]
    Timeout,
}

impl DeployError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Returns true if the request itself was invalid (client error).
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, DeployError::Validation { .. })
    }
}
