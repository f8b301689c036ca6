//! Typed collection operations.

use crate::codec;
use crate::error::StoreResult;
use crate::store::StoreInner;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::trace;

/// Outcome of a [`Collection::replace_one`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// An existing document matched the predicate and was replaced.
    Replaced,
    /// No document matched; the replacement was inserted (upsert).
    Upserted,
    /// No document matched and upsert was not requested.
    NotFound,
}

impl ReplaceOutcome {
    /// Returns true if the call inserted a new document.
    #[must_use]
    pub fn was_upserted(&self) -> bool {
        matches!(self, ReplaceOutcome::Upserted)
    }
}

/// A typed collection of documents.
///
/// `Collection<T>` provides type-safe access to documents of type
/// `T`, encoded as CBOR inside the store. Filtering is done with
/// host-language closures rather than a query DSL:
///
/// ```rust,ignore
/// let live = lessons.find(|l| l.course_slug == "go-basics")?;
/// ```
///
/// Every scan decodes the whole collection; collections here are
/// small (one course catalog), so full scans are the intended access
/// path.
pub struct Collection<T: Serialize + DeserializeOwned> {
    /// Shared store state.
    pub(crate) inner: Arc<StoreInner>,
    /// Collection name.
    pub(crate) name: String,
    /// Type marker.
    pub(crate) _marker: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> Collection<T> {
    /// Returns the collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decodes all documents in this collection.
    fn decode_all(&self) -> StoreResult<Vec<T>> {
        let map = self.inner.collections.read();
        let Some(raw) = map.get(&self.name) else {
            return Ok(Vec::new());
        };
        let mut docs = Vec::with_capacity(raw.len());
        for bytes in raw {
            docs.push(codec::from_cbor(bytes)?);
        }
        Ok(docs)
    }

    /// Runs a mutation under the write lock, then persists.
    fn mutate<R>(
        &self,
        f: impl FnOnce(&mut Vec<Vec<u8>>) -> StoreResult<R>,
    ) -> StoreResult<R> {
        let result = {
            let mut map = self.inner.collections.write();
            let raw = map.entry(self.name.clone()).or_default();
            f(raw)?
        };
        self.inner.save_if_persistent()?;
        Ok(result)
    }

    /// Returns the first document matching the predicate.
    pub fn find_one(&self, pred: impl Fn(&T) -> bool) -> StoreResult<Option<T>> {
        Ok(self.decode_all()?.into_iter().find(|d| pred(d)))
    }

    /// Returns all documents matching the predicate, in insertion
    /// order.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> StoreResult<Vec<T>> {
        Ok(self.decode_all()?.into_iter().filter(|d| pred(d)).collect())
    }

    /// Returns all matching documents sorted by the given key.
    pub fn find_sorted<K: Ord>(
        &self,
        pred: impl Fn(&T) -> bool,
        key: impl Fn(&T) -> K,
    ) -> StoreResult<Vec<T>> {
        let mut docs = self.find(pred)?;
        docs.sort_by_key(|d| key(d));
        Ok(docs)
    }

    /// Counts documents matching the predicate.
    pub fn count(&self, pred: impl Fn(&T) -> bool) -> StoreResult<u64> {
        Ok(self.find(pred)?.len() as u64)
    }

    /// Inserts a document.
    pub fn insert_one(&self, doc: &T) -> StoreResult<()> {
        let bytes = codec::to_cbor(doc)?;
        trace!(collection = %self.name, "insert_one");
        self.mutate(|raw| {
            raw.push(bytes);
            Ok(())
        })
    }

    /// Deletes the first document matching the predicate.
    ///
    /// Returns the number of documents deleted (0 or 1).
    pub fn delete_one(&self, pred: impl Fn(&T) -> bool) -> StoreResult<u64> {
        self.mutate(|raw| {
            for (i, bytes) in raw.iter().enumerate() {
                let doc: T = codec::from_cbor(bytes)?;
                if pred(&doc) {
                    raw.remove(i);
                    return Ok(1);
                }
            }
            Ok(0)
        })
    }

    /// Deletes every document matching the predicate.
    ///
    /// Returns the number of documents deleted. The survivors are
    /// committed only after every document decodes; a decode failure
    /// leaves the collection untouched.
    pub fn delete_many(&self, pred: impl Fn(&T) -> bool) -> StoreResult<u64> {
        self.mutate(|raw| {
            let mut kept = Vec::with_capacity(raw.len());
            let mut deleted = 0u64;
            for bytes in raw.iter() {
                let doc: T = codec::from_cbor(bytes)?;
                if pred(&doc) {
                    deleted += 1;
                } else {
                    kept.push(bytes.clone());
                }
            }
            *raw = kept;
            Ok(deleted)
        })
    }

    /// Replaces the first document matching the predicate wholesale.
    ///
    /// With `upsert`, a missing match inserts the replacement instead.
    /// The replacement is complete: no fields of the previous document
    /// are merged in.
    pub fn replace_one(
        &self,
        pred: impl Fn(&T) -> bool,
        replacement: &T,
        upsert: bool,
    ) -> StoreResult<ReplaceOutcome> {
        let bytes = codec::to_cbor(replacement)?;
        self.mutate(|raw| {
            for (i, existing) in raw.iter().enumerate() {
                let doc: T = codec::from_cbor(existing)?;
                if pred(&doc) {
                    raw[i] = bytes;
                    return Ok(ReplaceOutcome::Replaced);
                }
            }
            if upsert {
                raw.push(bytes);
                Ok(ReplaceOutcome::Upserted)
            } else {
                Ok(ReplaceOutcome::NotFound)
            }
        })
    }

    /// Applies a mutation to the first document matching the
    /// predicate.
    ///
    /// Returns the number of documents updated (0 or 1).
    pub fn update_one(
        &self,
        pred: impl Fn(&T) -> bool,
        mutator: impl Fn(&mut T),
    ) -> StoreResult<u64> {
        self.mutate(|raw| {
            for (i, existing) in raw.iter().enumerate() {
                let mut doc: T = codec::from_cbor(existing)?;
                if pred(&doc) {
                    mutator(&mut doc);
                    raw[i] = codec::to_cbor(&doc)?;
                    return Ok(1);
                }
            }
            Ok(0)
        })
    }

    /// Applies a mutation to every document matching the predicate.
    ///
    /// Returns the number of documents updated.
    pub fn update_many(
        &self,
        pred: impl Fn(&T) -> bool,
        mutator: impl Fn(&mut T),
    ) -> StoreResult<u64> {
        self.mutate(|raw| {
            let mut updated = 0u64;
            for existing in raw.iter_mut() {
                let mut doc: T = codec::from_cbor(existing)?;
                if pred(&doc) {
                    mutator(&mut doc);
                    *existing = codec::to_cbor(&doc)?;
                    updated += 1;
                }
            }
            Ok(updated)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{ReplaceOutcome, Store};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Lesson {
        slug: String,
        section_index: u32,
    }

    fn lesson(slug: &str, section_index: u32) -> Lesson {
        Lesson {
            slug: slug.into(),
            section_index,
        }
    }

    fn seeded() -> Store {
        let store = Store::in_memory();
        let lessons = store.collection("lessons");
        lessons.insert_one(&lesson("hello", 0)).unwrap();
        lessons.insert_one(&lesson("vars", 0)).unwrap();
        lessons.insert_one(&lesson("loops", 1)).unwrap();
        store
    }

    #[test]
    fn find_one_and_find() {
        let store = seeded();
        let lessons = store.collection::<Lesson>("lessons");

        let found = lessons.find_one(|l| l.slug == "vars").unwrap();
        assert_eq!(found, Some(lesson("vars", 0)));

        let missing = lessons.find_one(|l| l.slug == "nope").unwrap();
        assert!(missing.is_none());

        let in_section = lessons.find(|l| l.section_index == 0).unwrap();
        assert_eq!(in_section.len(), 2);
    }

    #[test]
    fn find_sorted_orders_by_key() {
        let store = Store::in_memory();
        let lessons = store.collection("lessons");
        lessons.insert_one(&lesson("c", 2)).unwrap();
        lessons.insert_one(&lesson("a", 0)).unwrap();
        lessons.insert_one(&lesson("b", 1)).unwrap();

        let sorted = lessons
            .find_sorted(|_| true, |l: &Lesson| l.section_index)
            .unwrap();
        let slugs: Vec<_> = sorted.iter().map(|l| l.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
    }

    #[test]
    fn delete_one_removes_first_match() {
        let store = seeded();
        let lessons = store.collection::<Lesson>("lessons");

        assert_eq!(lessons.delete_one(|l| l.section_index == 0).unwrap(), 1);
        assert_eq!(lessons.count(|_| true).unwrap(), 2);
        assert_eq!(lessons.delete_one(|l| l.slug == "nope").unwrap(), 0);
    }

    #[test]
    fn delete_many_removes_all_matches() {
        let store = seeded();
        let lessons = store.collection::<Lesson>("lessons");

        assert_eq!(lessons.delete_many(|l| l.section_index == 0).unwrap(), 2);
        assert_eq!(lessons.count(|_| true).unwrap(), 1);
    }

    #[test]
    fn failed_delete_many_leaves_collection_intact() {
        #[derive(Debug, Serialize, Deserialize)]
        struct Mismatched {
            title: String,
        }

        let store = seeded();

        // Reading "lessons" through the wrong document type fails to
        // decode; the error must not discard the stored documents.
        let mismatched = store.collection::<Mismatched>("lessons");
        assert!(mismatched.delete_many(|_| true).is_err());

        let lessons = store.collection::<Lesson>("lessons");
        assert_eq!(lessons.count(|_| true).unwrap(), 3);
    }

    #[test]
    fn replace_one_is_wholesale() {
        let store = seeded();
        let lessons = store.collection::<Lesson>("lessons");

        let outcome = lessons
            .replace_one(|l| l.slug == "hello", &lesson("hello", 3), false)
            .unwrap();
        assert_eq!(outcome, ReplaceOutcome::Replaced);

        let found = lessons.find_one(|l| l.slug == "hello").unwrap().unwrap();
        assert_eq!(found.section_index, 3);
    }

    #[test]
    fn replace_one_upserts_when_missing() {
        let store = Store::in_memory();
        let lessons = store.collection::<Lesson>("lessons");

        let outcome = lessons
            .replace_one(|l| l.slug == "new", &lesson("new", 0), true)
            .unwrap();
        assert!(outcome.was_upserted());
        assert_eq!(lessons.count(|_| true).unwrap(), 1);

        let outcome = lessons
            .replace_one(|l| l.slug == "missing", &lesson("missing", 0), false)
            .unwrap();
        assert_eq!(outcome, ReplaceOutcome::NotFound);
        assert_eq!(lessons.count(|_| true).unwrap(), 1);
    }

    #[test]
    fn update_one_and_many() {
        let store = seeded();
        let lessons = store.collection::<Lesson>("lessons");

        let updated = lessons
            .update_one(|l| l.slug == "hello", |l| l.section_index = 9)
            .unwrap();
        assert_eq!(updated, 1);
        let found = lessons.find_one(|l| l.slug == "hello").unwrap().unwrap();
        assert_eq!(found.section_index, 9);

        let updated = lessons
            .update_many(|l| l.section_index == 0, |l| l.section_index = 5)
            .unwrap();
        assert_eq!(updated, 1); // only "vars" remains at index 0
    }
}
