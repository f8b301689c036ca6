//! The store handle: named collections over a storage backend.

use crate::backend::StorageBackend;
use crate::codec;
use crate::collection::Collection;
use crate::error::{StoreError, StoreResult};
use crate::memory::MemoryBackend;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Serialized form of a whole store.
///
/// Collection contents are kept as opaque CBOR-encoded documents so
/// the snapshot format does not depend on any domain type.
#[derive(Serialize, Deserialize)]
pub(crate) struct StoreSnapshot {
    /// Collection name -> encoded documents, in insertion order.
    pub collections: BTreeMap<String, Vec<Vec<u8>>>,
}

/// Shared store state.
pub(crate) struct StoreInner {
    /// Collection name -> encoded documents, in insertion order.
    pub(crate) collections: RwLock<BTreeMap<String, Vec<Vec<u8>>>>,
    /// Snapshot persistence backend.
    backend: Box<dyn StorageBackend>,
}

impl StoreInner {
    /// Persists the current state if the backend is persistent.
    ///
    /// Called after every committed mutation so already-applied writes
    /// survive a crash, mirroring a per-operation-durable database.
    pub(crate) fn save_if_persistent(&self) -> StoreResult<()> {
        if !self.backend.is_persistent() {
            return Ok(());
        }
        self.save()
    }

    fn save(&self) -> StoreResult<()> {
        let snapshot = StoreSnapshot {
            collections: self.collections.read().clone(),
        };
        let bytes = codec::to_cbor(&snapshot)?;
        self.backend.persist(&bytes)
    }
}

/// A handle to a document store.
///
/// The store holds named collections of CBOR-encoded documents and is
/// constructed explicitly at process start, then passed into
/// collaborators. There is no ambient global handle.
///
/// Cloning is cheap; clones share the same underlying state.
///
/// # Example
///
/// ```rust,ignore
/// use coursedb_store::Store;
///
/// let store = Store::in_memory();
/// let courses = store.collection::<CourseDoc>("courses");
/// courses.insert_one(&course)?;
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Opens a store over the given backend, restoring any persisted
    /// snapshot.
    pub fn open(backend: Box<dyn StorageBackend>) -> StoreResult<Self> {
        let collections = match backend.load()? {
            Some(bytes) => {
                let snapshot: StoreSnapshot = codec::from_cbor(&bytes)
                    .map_err(|e| StoreError::snapshot_corrupted(e.to_string()))?;
                debug!(
                    collections = snapshot.collections.len(),
                    "restored store snapshot"
                );
                snapshot.collections
            }
            None => BTreeMap::new(),
        };

        Ok(Self {
            inner: Arc::new(StoreInner {
                collections: RwLock::new(collections),
                backend,
            }),
        })
    }

    /// Creates an ephemeral in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                collections: RwLock::new(BTreeMap::new()),
                backend: Box::new(MemoryBackend::new()),
            }),
        }
    }

    /// Returns a typed handle to the named collection.
    ///
    /// The collection is created lazily on first write; reading a
    /// collection that was never written behaves as empty.
    #[must_use]
    pub fn collection<T: Serialize + DeserializeOwned>(&self, name: &str) -> Collection<T> {
        Collection {
            inner: Arc::clone(&self.inner),
            name: name.to_string(),
            _marker: PhantomData,
        }
    }

    /// Persists the current state to the backend unconditionally.
    pub fn flush(&self) -> StoreResult<()> {
        self.inner.save()
    }

    /// Returns the names of collections that hold at least one
    /// document.
    #[must_use]
    pub fn collection_names(&self) -> Vec<String> {
        self.inner
            .collections
            .read()
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotBackend;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Doc {
        slug: String,
    }

    fn doc(slug: &str) -> Doc {
        Doc { slug: slug.into() }
    }

    #[test]
    fn empty_store() {
        let store = Store::in_memory();
        assert!(store.collection_names().is_empty());

        let docs = store
            .collection::<Doc>("courses")
            .find(|_| true)
            .unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn collections_are_independent() {
        let store = Store::in_memory();
        store.collection("courses").insert_one(&doc("a")).unwrap();
        store.collection("lessons").insert_one(&doc("b")).unwrap();

        assert_eq!(store.collection::<Doc>("courses").count(|_| true).unwrap(), 1);
        assert_eq!(store.collection::<Doc>("lessons").count(|_| true).unwrap(), 1);
        assert_eq!(store.collection_names(), vec!["courses", "lessons"]);
    }

    #[test]
    fn clones_share_state() {
        let store = Store::in_memory();
        let clone = store.clone();

        store.collection("courses").insert_one(&doc("a")).unwrap();
        assert_eq!(clone.collection::<Doc>("courses").count(|_| true).unwrap(), 1);
    }

    #[test]
    fn garbage_snapshot_reports_corruption() {
        let backend = crate::MemoryBackend::with_snapshot(vec![0xff, 0x00, 0x13]);
        let result = Store::open(Box::new(backend));
        assert!(matches!(result, Err(StoreError::SnapshotCorrupted { .. })));
    }

    #[test]
    fn reopen_restores_documents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.cdb");

        {
            let backend = SnapshotBackend::open(&path).unwrap();
            let store = Store::open(Box::new(backend)).unwrap();
            store.collection("courses").insert_one(&doc("go-basics")).unwrap();
        }

        let backend = SnapshotBackend::open(&path).unwrap();
        let store = Store::open(Box::new(backend)).unwrap();
        let found = store
            .collection::<Doc>("courses")
            .find_one(|d| d.slug == "go-basics")
            .unwrap();
        assert_eq!(found, Some(doc("go-basics")));
    }
}
