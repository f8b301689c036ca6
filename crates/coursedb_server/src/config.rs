//! API server configuration.

use coursedb_deploy::DeployConfig;
use std::time::Duration;

/// Configuration for the API handlers.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Whether publisher endpoints require a token.
    pub require_auth: bool,
    /// Secret key for token validation (if auth enabled).
    pub auth_secret: Option<Vec<u8>>,
    /// Publisher token expiration.
    pub token_expiry: Duration,
    /// Deploy reconciler settings.
    pub deploy: DeployConfig,
}

impl ServerConfig {
    /// Creates a configuration with auth disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            require_auth: false,
            auth_secret: None,
            token_expiry: Duration::from_secs(24 * 60 * 60),
            deploy: DeployConfig::default(),
        }
    }

    /// Enables publisher authentication with the given secret.
    #[must_use]
    pub fn with_auth(mut self, secret: Vec<u8>) -> Self {
        self.require_auth = true;
        self.auth_secret = Some(secret);
        self
    }

    /// Sets the publisher token expiration.
    #[must_use]
    pub fn with_token_expiry(mut self, expiry: Duration) -> Self {
        self.token_expiry = expiry;
        self
    }

    /// Sets the deploy reconciler settings.
    #[must_use]
    pub fn with_deploy(mut self, deploy: DeployConfig) -> Self {
        self.deploy = deploy;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}
