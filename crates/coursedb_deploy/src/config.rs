//! Deploy engine configuration.

use std::time::Duration;

/// Configuration for the course reconciler.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Overall time budget for one reconcile call.
    ///
    /// Checked between mutations; expiry aborts the deploy with a
    /// timeout error.
    pub time_budget: Duration,
}

impl DeployConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            time_budget: Duration::from_secs(30),
        }
    }

    /// Sets the overall time budget.
    #[must_use]
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self::new()
    }
}
