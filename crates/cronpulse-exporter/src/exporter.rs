//! Exporter facade over the metric writer.
//!
//! Maps job-lifecycle semantics (and the legacy dimension naming scheme)
//! onto upserts against the resolved exposition path. When disabled,
//! every call is a guaranteed no-op: no lock, no file, no directory.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use cronpulse_lock::{FileLockFactory, LockFactory};
use cronpulse_metrics::{MetricKind, MetricResult, MetricWriter};
use cronpulse_store::{OsStorage, Storage};

use crate::config::Config;

/// Help texts for the well-known job lifecycle metrics.
pub mod help {
    pub const FAILED: &str = "Whether the job failed (1 = failed, 0 = success)";
    pub const EXIT_CODE: &str = "Exit code of the last job execution";
    pub const DURATION: &str = "Duration of the last job execution in seconds";
    pub const RUNNING: &str = "Whether the job is currently running (1 = running, 0 = finished)";
    pub const LAST_RUN: &str = "Timestamp of the last job execution";
    pub const RUNS_TOTAL: &str = "Total number of job runs";
    pub const DIMENSION: &str = "Job metric recorded with an explicit dimension label";
}

/// Canonical metric suffix and help text for a legacy dimension value.
fn dimension_metric(dimension: &str) -> Option<(&'static str, &'static str)> {
    match dimension {
        "failed" => Some(("failed", help::FAILED)),
        "exit_code" => Some(("exit_code", help::EXIT_CODE)),
        "duration" => Some(("duration_seconds", help::DURATION)),
        "run" => Some(("running", help::RUNNING)),
        "last" => Some(("last_run_timestamp_seconds", help::LAST_RUN)),
        _ => None,
    }
}

/// Writes job metrics to the configured exposition file.
#[derive(Clone)]
pub struct Exporter {
    config: Config,
    writer: MetricWriter,
}

impl Exporter {
    pub fn builder() -> ExporterBuilder {
        ExporterBuilder::default()
    }

    /// Full path of the exposition file this exporter writes to.
    pub fn exporter_path(&self) -> PathBuf {
        self.config.exporter_path()
    }

    /// Upsert a gauge sample for `job`.
    ///
    /// `name` is prefixed with the configured base name when not already.
    pub fn write_gauge(&self, name: &str, job: &str, value: &str, help: &str) -> MetricResult<()> {
        if self.config.disabled() {
            return Ok(());
        }
        self.writer.write_metric(
            &self.exporter_path(),
            &self.config.prefixed(name),
            MetricKind::Gauge,
            job,
            &[],
            value,
            help,
        )
    }

    /// Increment a counter sample for `job` by one.
    pub fn increment_counter(
        &self,
        name: &str,
        job: &str,
        labels: &[(&str, &str)],
        help: &str,
    ) -> MetricResult<()> {
        if self.config.disabled() {
            return Ok(());
        }
        self.writer.increment_counter(
            &self.exporter_path(),
            &self.config.prefixed(name),
            job,
            labels,
            help,
        )
    }

    /// Accept a legacy free-form dimension write.
    ///
    /// Known dimensions map onto their canonical metrics; anything else
    /// keeps the old shape, the bare prefix as metric name with the
    /// dimension carried as a label.
    pub fn write_dimension(&self, job: &str, dimension: &str, value: &str) -> MetricResult<()> {
        if self.config.disabled() {
            return Ok(());
        }
        match dimension_metric(dimension) {
            Some((suffix, help)) => self.write_gauge(suffix, job, value, help),
            None => self.writer.write_metric(
                &self.exporter_path(),
                self.config.prefix(),
                MetricKind::Gauge,
                job,
                &[("dimension", dimension)],
                value,
                help::DIMENSION,
            ),
        }
    }
}

/// Builder for [`Exporter`]; unset fields fall back to defaults and the
/// environment (see [`Config`]).
#[derive(Default)]
pub struct ExporterBuilder {
    dir: Option<PathBuf>,
    filename: Option<String>,
    prefix: Option<String>,
    disabled: bool,
    storage: Option<Arc<dyn Storage>>,
    locks: Option<Arc<dyn LockFactory>>,
}

impl ExporterBuilder {
    /// Explicit exporter directory, overriding environment and default.
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn metric_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Disable all writes; every exporter call becomes a no-op.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Storage backend; defaults to the real filesystem.
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Lock backend; defaults to sidecar file locks.
    pub fn lock_factory(mut self, locks: Arc<dyn LockFactory>) -> Self {
        self.locks = Some(locks);
        self
    }

    pub fn build(self) -> Exporter {
        let config = Config::resolve(self.dir, self.filename, self.prefix, self.disabled);
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(OsStorage::new()) as Arc<dyn Storage>);
        let locks = self
            .locks
            .unwrap_or_else(|| Arc::new(FileLockFactory::new()) as Arc<dyn LockFactory>);
        debug!(
            path = %config.exporter_path().display(),
            disabled = config.disabled(),
            "exporter configured"
        );
        Exporter {
            config,
            writer: MetricWriter::new(storage, locks),
        }
    }
}
