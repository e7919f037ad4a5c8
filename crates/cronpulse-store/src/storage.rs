//! Storage trait and its on-disk / in-memory implementations.
//!
//! The metric writer only needs four capabilities: read a whole file,
//! overwrite a whole file, create a directory tree, and check existence.
//! Exposition files are small, so there is no streaming surface.

use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// Minimal filesystem capability surface used by the metric writer.
pub trait Storage: Send + Sync {
    /// Read the entire file as text. Returns [`StorageError::NotFound`]
    /// if the file does not exist.
    fn read(&self, path: &Path) -> StorageResult<String>;

    /// Overwrite the entire file with `contents`, creating it if absent.
    fn write(&self, path: &Path, contents: &str) -> StorageResult<()>;

    /// Create `path` and all missing parent directories.
    fn create_dir_all(&self, path: &Path) -> StorageResult<()>;

    /// True if a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;
}

/// Real filesystem storage, used in production.
#[derive(Debug, Default, Clone)]
pub struct OsStorage;

impl OsStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for OsStorage {
    fn read(&self, path: &Path) -> StorageResult<String> {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
            _ => StorageError::Read(e.to_string()),
        })
    }

    fn write(&self, path: &Path, contents: &str) -> StorageResult<()> {
        std::fs::write(path, contents).map_err(|e| StorageError::Write(e.to_string()))?;
        debug!(path = %path.display(), bytes = contents.len(), "file written");
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> StorageResult<()> {
        std::fs::create_dir_all(path).map_err(|e| StorageError::CreateDir(e.to_string()))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// In-memory storage for deterministic tests.
///
/// `Clone` shares the same underlying map, so the code under test and the
/// test itself observe the same files.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    files: HashMap<PathBuf, String>,
    dirs: HashSet<PathBuf>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, path: &Path) -> StorageResult<String> {
        let inner = self.inner.lock();
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.display().to_string()))
    }

    fn write(&self, path: &Path, contents: &str) -> StorageResult<()> {
        let mut inner = self.inner.lock();
        inner.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> StorageResult<()> {
        let mut inner = self.inner.lock();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            inner.dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.lock();
        inner.files.contains_key(path) || inner.dirs.contains(path)
    }
}
