//! Subscriber access checks and grant management.

use crate::documents::{collections, AccessGrant, SuggestionDoc, UNIVERSAL_SCOPE};
use crate::error::CatalogResult;
use coursedb_store::Store;
use tracing::debug;

/// Access-control service over the grants collection.
///
/// Gated lessons require an access grant under the universal scope.
/// Subscribing is insert-if-absent keyed on `(email, scope)`, so
/// repeat subscriptions are no-ops.
pub struct AccessControl {
    store: Store,
}

impl AccessControl {
    /// Creates the service over a store handle.
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Returns true if the email holds a universal-scope grant.
    ///
    /// An empty email never has access.
    pub fn has_access(&self, email: &str) -> CatalogResult<bool> {
        if email.is_empty() {
            return Ok(false);
        }
        let grant = self
            .store
            .collection::<AccessGrant>(collections::ACCESS_GRANTS)
            .find_one(|g| g.email == email && g.scope == UNIVERSAL_SCOPE)?;
        Ok(grant.is_some())
    }

    /// Records a subscription grant if one does not already exist.
    ///
    /// Returns true when a new grant was created.
    pub fn subscribe(&self, email: &str, scope: &str) -> CatalogResult<bool> {
        let grants = self
            .store
            .collection::<AccessGrant>(collections::ACCESS_GRANTS);

        if grants
            .find_one(|g| g.email == email && g.scope == scope)?
            .is_some()
        {
            return Ok(false);
        }

        let grant = AccessGrant {
            email: email.to_string(),
            scope: scope.to_string(),
            created_at_ms: crate::documents::now_ms(),
        };
        grants.insert_one(&grant)?;
        debug!(scope, "subscription recorded");
        Ok(true)
    }

    /// Stores a course suggestion.
    pub fn record_suggestion(&self, email: Option<String>, text: &str) -> CatalogResult<SuggestionDoc> {
        let suggestion = SuggestionDoc::new(email, text);
        self.store
            .collection::<SuggestionDoc>(collections::SUGGESTIONS)
            .insert_one(&suggestion)?;
        Ok(suggestion)
    }
}
