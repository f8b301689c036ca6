//! Storage backend trait.

use crate::error::StoreResult;

/// A backend that can persist and restore whole-store snapshots.
///
/// Backends are **opaque byte stores** - they do not interpret the
/// snapshot they hold. The store owns the snapshot format (canonical
/// CBOR); backends only move bytes.
///
/// Implementations must be `Send + Sync` so a store can be shared
/// across threads.
pub trait StorageBackend: Send + Sync {
    /// Loads the most recently persisted snapshot.
    ///
    /// Returns `None` when the backend holds no snapshot yet (a fresh
    /// store).
    fn load(&self) -> StoreResult<Option<Vec<u8>>>;

    /// Persists a snapshot, replacing any previous one.
    fn persist(&self, snapshot: &[u8]) -> StoreResult<()>;

    /// Returns true if snapshots survive process restart.
    fn is_persistent(&self) -> bool {
        true
    }
}
