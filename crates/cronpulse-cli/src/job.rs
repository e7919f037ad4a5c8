//! Wrapped command execution and idle-wait.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::process::Command;
use tracing::{info, warn};

/// Spawn the wrapped command and wait for it to finish.
///
/// The first element is the program, the rest its arguments. Stdout is
/// streamed into `log` when one is given and inherited otherwise; stderr
/// is always inherited so cron can mail it.
pub async fn execute(command: &[String], log: Option<&Path>) -> anyhow::Result<ExitStatus> {
    let (program, args) = command.split_first().context("empty command")?;

    let mut cmd = Command::new(program);
    cmd.args(args);

    let Some(log_path) = log else {
        return cmd
            .status()
            .await
            .with_context(|| format!("failed to run {program}"));
    };

    cmd.stdout(Stdio::piped());
    let mut child = cmd
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;
    let mut stdout = child.stdout.take().context("child stdout not captured")?;

    let mut logfile = tokio::fs::File::create(log_path)
        .await
        .with_context(|| format!("failed to create log file {}", log_path.display()))?;
    let copy = tokio::spawn(async move {
        if let Err(e) = tokio::io::copy(&mut stdout, &mut logfile).await {
            warn!(error = %e, "error copying job output to log file");
        }
    });

    let status = child.wait().await.context("failed waiting for the job")?;
    let _ = copy.await;
    Ok(status)
}

/// Sleep out the remainder of `idle_seconds`, counted from `job_start`,
/// so the scraper observes at least one running sample. Jobs that already
/// ran longer do not wait.
pub async fn idle_wait(job_start: Instant, idle_seconds: u64) {
    if idle_seconds == 0 {
        return;
    }
    let target = Duration::from_secs(idle_seconds);
    if let Some(remaining) = target.checked_sub(job_start.elapsed()) {
        info!(?remaining, "idle flag active, waiting");
        tokio::time::sleep(remaining).await;
    }
}
