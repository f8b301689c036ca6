//! # coursedb store
//!
//! Document-store abstraction for coursedb.
//!
//! This crate provides the lowest-level persistence layer: named
//! collections of CBOR-encoded documents behind a pluggable snapshot
//! backend.
//!
//! ## Design Principles
//!
//! - Collections are typed (`Collection<T>`); filtering uses
//!   host-language closures, not a query DSL
//! - Backends are opaque byte stores; the store owns the snapshot
//!   format
//! - The store handle is constructed explicitly and passed to
//!   collaborators - no ambient globals
//!
//! ## Available Backends
//!
//! - [`MemoryBackend`] - For testing and ephemeral stores
//! - [`SnapshotBackend`] - Single-file persistence with an advisory
//!   process lock
//!
//! ## Example
//!
//! ```rust
//! use coursedb_store::Store;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Course { slug: String }
//!
//! let store = Store::in_memory();
//! let courses = store.collection::<Course>("courses");
//! courses.insert_one(&Course { slug: "go-basics".into() }).unwrap();
//! assert_eq!(courses.count(|_| true).unwrap(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod codec;
mod collection;
mod error;
mod memory;
mod snapshot;
mod store;

pub use backend::StorageBackend;
pub use collection::{Collection, ReplaceOutcome};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryBackend;
pub use snapshot::SnapshotBackend;
pub use store::Store;
