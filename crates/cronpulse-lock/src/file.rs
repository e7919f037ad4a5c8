//! Durable cross-process lock backed by a sidecar file.
//!
//! The lock lives on `<path>.lock`, not on the exposition file itself, so
//! the file can be replaced wholesale while the lock is held. The OS drops
//! an advisory lock when the owning descriptor closes, so a crashed holder
//! cannot deadlock later writers.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::{LockError, LockResult};
use crate::locker::{LockFactory, Locker};

/// Advisory exclusive lock on a sidecar `<path>.lock` file.
pub struct FileLocker {
    lock_path: PathBuf,
    file: Option<File>,
}

impl FileLocker {
    pub fn new(path: &Path) -> Self {
        let mut sidecar = path.as_os_str().to_os_string();
        sidecar.push(".lock");
        Self {
            lock_path: PathBuf::from(sidecar),
            file: None,
        }
    }

    /// Path of the sidecar lock file.
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }
}

impl Locker for FileLocker {
    fn lock(&mut self) -> LockResult<()> {
        if self.file.is_some() {
            // Already held by this locker.
            return Ok(());
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|e| LockError::Acquire(e.to_string()))?;

        // Fast path first; fall back to a blocking acquire under contention.
        if file.try_lock_exclusive().is_err() {
            FileExt::lock_exclusive(&file).map_err(|e| LockError::Acquire(e.to_string()))?;
        }

        debug!(path = %self.lock_path.display(), "file lock acquired");
        self.file = Some(file);
        Ok(())
    }

    fn unlock(&mut self) -> LockResult<()> {
        if let Some(file) = self.file.take() {
            FileExt::unlock(&file).map_err(|e| LockError::Release(e.to_string()))?;
            debug!(path = %self.lock_path.display(), "file lock released");
        }
        Ok(())
    }
}

impl Drop for FileLocker {
    fn drop(&mut self) {
        // Closing the descriptor releases the lock even without unlock().
        let _ = self.unlock();
    }
}

/// Produces [`FileLocker`]s; the production lock backend.
#[derive(Debug, Default, Clone)]
pub struct FileLockFactory;

impl FileLockFactory {
    pub fn new() -> Self {
        Self
    }
}

impl LockFactory for FileLockFactory {
    fn locker(&self, path: &Path) -> Box<dyn Locker> {
        Box::new(FileLocker::new(path))
    }
}
