//! In-memory storage backend for testing and ephemeral stores.

use crate::backend::StorageBackend;
use crate::error::StoreResult;
use parking_lot::RwLock;

/// An in-memory storage backend.
///
/// This backend keeps the latest snapshot in memory and is suitable
/// for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    snapshot: RwLock<Option<Vec<u8>>>,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory backend seeded with a snapshot.
    ///
    /// Useful for testing restore scenarios.
    #[must_use]
    pub fn with_snapshot(snapshot: Vec<u8>) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot)),
        }
    }

    /// Returns a copy of the held snapshot, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Vec<u8>> {
        self.snapshot.read().clone()
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.snapshot.read().clone())
    }

    fn persist(&self, snapshot: &[u8]) -> StoreResult<()> {
        *self.snapshot.write() = Some(snapshot.to_vec());
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_backend() {
        let backend = MemoryBackend::new();
        assert!(backend.load().unwrap().is_none());
        assert!(!backend.is_persistent());
    }

    #[test]
    fn persist_and_load() {
        let backend = MemoryBackend::new();
        backend.persist(b"snapshot bytes").unwrap();
        assert_eq!(backend.load().unwrap(), Some(b"snapshot bytes".to_vec()));
    }

    #[test]
    fn seeded_backend() {
        let backend = MemoryBackend::with_snapshot(vec![1, 2, 3]);
        assert_eq!(backend.load().unwrap(), Some(vec![1, 2, 3]));
    }
}
