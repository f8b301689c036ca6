//! File-backed snapshot storage with advisory locking.

use crate::backend::StorageBackend;
use crate::error::{StoreError, StoreResult};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A storage backend that persists snapshots to a single file.
///
/// The snapshot is rewritten atomically: bytes are written to a
/// sibling temp file, synced, then renamed over the live file. An
/// exclusive advisory lock on a `.lock` sibling is held for the
/// lifetime of the backend so two processes cannot open the same
/// store concurrently.
pub struct SnapshotBackend {
    /// Path of the live snapshot file.
    path: PathBuf,
    /// Lock file handle. The advisory lock is released on drop.
    lock_file: File,
}

impl SnapshotBackend {
    /// Opens a snapshot backend at the given file path.
    ///
    /// Parent directories are created if missing. Fails with
    /// [`StoreError::Locked`] when another process already holds the
    /// store lock.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let lock_path = path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        FileExt::try_lock_exclusive(&lock_file).map_err(|_| StoreError::Locked)?;

        Ok(Self { path, lock_file })
    }

    /// Returns the path of the live snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for SnapshotBackend {
    fn load(&self) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self, snapshot: &[u8]) -> StoreResult<()> {
        let tmp_path = self.path.with_extension("tmp");
        {
            let mut tmp = File::create(&tmp_path)?;
            tmp.write_all(snapshot)?;
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl Drop for SnapshotBackend {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.lock_file);
    }
}
