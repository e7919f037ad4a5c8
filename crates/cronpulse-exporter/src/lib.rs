//! cronpulse-exporter — facade between job lifecycle and the metric engine.
//!
//! Resolves where the exposition file lives (explicit option >
//! `COLLECTOR_TEXTFILE_PATH` > default), prefixes metric names, maps the
//! legacy dimension naming scheme onto canonical metrics, and turns every
//! call into a no-op when writing is disabled.
//!
//! ```no_run
//! use cronpulse_exporter::{Exporter, help};
//!
//! let exporter = Exporter::builder().build();
//! exporter.write_gauge("running", "daily_backup", "1", help::RUNNING)?;
//! # Ok::<(), cronpulse_metrics::MetricError>(())
//! ```

pub mod config;
pub mod exporter;

pub use config::{Config, DEFAULT_EXPORTER_DIR, DEFAULT_FILENAME, DEFAULT_PREFIX, ENV_EXPORTER_DIR};
pub use exporter::{Exporter, ExporterBuilder, help};
