//! Command implementations.

pub mod courses;
pub mod curriculum;
pub mod deploy;
pub mod token;

use coursedb_server::{ApiContext, RequestHandler, ServerConfig};
use coursedb_store::{SnapshotBackend, Store};
use std::path::Path;
use std::sync::Arc;

/// Opens the snapshot store at `path` and wraps it in a handler.
pub(crate) fn open_handler(path: &Path) -> Result<RequestHandler, Box<dyn std::error::Error>> {
    let backend = SnapshotBackend::open(path)?;
    let store = Store::open(Box::new(backend))?;
    let context = Arc::new(ApiContext::new(store, ServerConfig::default()));
    Ok(RequestHandler::new(context))
}
