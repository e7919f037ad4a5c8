//! Periodic duration/heartbeat reporter.
//!
//! While the job runs, a background task emits `duration_seconds` and
//! `last_run_timestamp_seconds` once per second, concurrent with the
//! job's own lifecycle writes. Both go through the same per-path lock as
//! every other writer.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tokio::sync::watch;
use tracing::warn;

use cronpulse_exporter::{Exporter, help};

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Run the reporter loop until `shutdown` flips.
///
/// Write failures are logged and the loop keeps going; the reporter must
/// never take the wrapped job down with it.
pub async fn run(
    exporter: Exporter,
    job: String,
    job_start: Instant,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(REPORT_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let duration = format!("{:.2}", job_start.elapsed().as_secs_f64());
                if let Err(e) = exporter.write_gauge("duration_seconds", &job, &duration, help::DURATION) {
                    warn!(error = %e, "failed to write duration sample");
                }
                let stamp = unix_timestamp().to_string();
                if let Err(e) = exporter.write_gauge("last_run_timestamp_seconds", &job, &stamp, help::LAST_RUN) {
                    warn!(error = %e, "failed to write heartbeat sample");
                }
            }
            _ = shutdown.changed() => break,
        }
    }
}

/// Seconds since the unix epoch.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
