//! cronpulse-metrics — concurrent-safe upserts on a shared exposition file.
//!
//! Several independent writers (separate job invocations plus the
//! in-process periodic reporter) mutate one Prometheus textfile. The
//! [`MetricWriter`] serializes them behind a per-path lock and performs a
//! full read-modify-write for every sample, keeping the file valid
//! exposition content after each write:
//!
//! ```text
//! # HELP crontab_running Whether the job is currently running
//! # TYPE crontab_running gauge
//! crontab_running{name="daily_backup"} 1
//! ```
//!
//! Storage and locking are injected ([`cronpulse_store::Storage`],
//! [`cronpulse_lock::LockFactory`]), so the whole engine runs unchanged
//! against the real filesystem or fully in memory.

pub mod error;
pub mod exposition;
pub mod writer;

pub use error::{MetricError, MetricResult};
pub use exposition::{MetricKind, build_label_string, escape_label_value};
pub use writer::MetricWriter;
