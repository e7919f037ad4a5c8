//! Metric writer — the locked read-modify-write engine.
//!
//! Every mutation takes the per-path lock, reads the whole exposition
//! file, computes the new content, and writes it back as a full
//! overwrite. Gauges (and externally-computed counter values) go through
//! [`MetricWriter::write_metric`]; monotonic counters go through
//! [`MetricWriter::increment_counter`]. Both paths share the same lock,
//! so concurrent mutators against one file serialize.

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use cronpulse_lock::{LockFactory, Locker};
use cronpulse_store::Storage;

use crate::error::MetricResult;
use crate::exposition::{self, MetricKind};

/// Performs locked upserts on an exposition file.
#[derive(Clone)]
pub struct MetricWriter {
    storage: Arc<dyn Storage>,
    locks: Arc<dyn LockFactory>,
}

impl MetricWriter {
    pub fn new(storage: Arc<dyn Storage>, locks: Arc<dyn LockFactory>) -> Self {
        Self { storage, locks }
    }

    /// Write (upsert) one sample with an explicit value.
    ///
    /// `labels` are appended after the mandatory `name="<job>"` pair in
    /// the order given; that order is part of the sample's identity.
    #[allow(clippy::too_many_arguments)]
    pub fn write_metric(
        &self,
        path: &Path,
        name: &str,
        kind: MetricKind,
        job: &str,
        labels: &[(&str, &str)],
        value: &str,
        help: &str,
    ) -> MetricResult<()> {
        let mut locker = self.lock_leniently(path);
        let result = self.write_sample_locked(path, name, kind, job, labels, value, help);
        let _ = locker.unlock();
        result
    }

    /// Increment a counter sample by one.
    ///
    /// A missing file or missing sample initializes the counter to `1`.
    /// An unparseable stored value also resets to `1` rather than failing.
    pub fn increment_counter(
        &self,
        path: &Path,
        name: &str,
        job: &str,
        labels: &[(&str, &str)],
        help: &str,
    ) -> MetricResult<()> {
        let mut locker = self.lock_leniently(path);
        let result = self.increment_locked(path, name, job, labels, help);
        let _ = locker.unlock();
        result
    }

    /// Acquire the path lock, or log and carry on without it.
    fn lock_leniently(&self, path: &Path) -> Box<dyn Locker> {
        let mut locker = self.locks.locker(path);
        if let Err(e) = locker.lock() {
            warn!(path = %path.display(), error = %e, "could not lock exposition file, writing anyway");
        }
        locker
    }

    #[allow(clippy::too_many_arguments)]
    fn write_sample_locked(
        &self,
        path: &Path,
        name: &str,
        kind: MetricKind,
        job: &str,
        labels: &[(&str, &str)],
        value: &str,
        help: &str,
    ) -> MetricResult<()> {
        self.ensure_parent_dir(path)?;
        let content = self.read_or_create(path)?;
        let label_str = exposition::build_label_string(job, labels);
        let updated = exposition::upsert_sample(&content, name, &label_str, kind, value, help);
        self.storage.write(path, &updated)?;
        Ok(())
    }

    fn increment_locked(
        &self,
        path: &Path,
        name: &str,
        job: &str,
        labels: &[(&str, &str)],
        help: &str,
    ) -> MetricResult<()> {
        let content = match self.storage.read(path) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => {
                // First write to this file: counter starts at 1.
                return self.write_sample_locked(
                    path,
                    name,
                    MetricKind::Counter,
                    job,
                    labels,
                    "1",
                    help,
                );
            }
            Err(e) => return Err(e.into()),
        };

        let label_str = exposition::build_label_string(job, labels);
        let key = exposition::sample_key(name, &label_str);
        let value = match exposition::find_sample_value(&content, &key) {
            Some(current) => exposition::increment_value(current),
            None => "1".to_string(),
        };

        let updated =
            exposition::upsert_sample(&content, name, &label_str, MetricKind::Counter, &value, help);
        self.storage.write(path, &updated)?;
        Ok(())
    }

    fn ensure_parent_dir(&self, path: &Path) -> MetricResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.storage.create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// Read the file, treating absence as empty content. The empty file
    /// is created immediately so absence and unreadability stay
    /// distinguishable on later reads.
    fn read_or_create(&self, path: &Path) -> MetricResult<String> {
        match self.storage.read(path) {
            Ok(content) => Ok(content),
            Err(e) if e.is_not_found() => {
                self.storage.write(path, "")?;
                Ok(String::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}
