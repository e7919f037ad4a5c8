//! cronpulse — execute and monitor a cron job, publishing metrics for
//! the Prometheus textfile collector.
//!
//! # Usage
//!
//! ```text
//! cronpulse --name nightly_etl --log /var/log/etl.log -- /usr/bin/python3 etl.py
//! cronpulse -n short_job --idle 60 -- /usr/bin/backup --fast
//! ```
//!
//! The wrapper records run counters, a running flag, failure flag, exit
//! code, duration and a last-run timestamp into a shared exposition file
//! that the node_exporter textfile collector scrapes later. Its own exit
//! code mirrors the wrapped command's.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tokio::sync::watch;
use tracing::warn;

use cronpulse_exporter::{Exporter, help};

mod job;
mod reporter;

#[derive(Parser)]
#[command(
    name = "cronpulse",
    version,
    about = "Execute and monitor a cron job, publishing metrics for the Prometheus textfile collector"
)]
struct Cli {
    /// Job name, as it will appear in alerts.
    #[arg(short, long)]
    name: String,

    /// Log file for the wrapped command's stdout.
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Keep the wrapper alive for at least this many seconds so the
    /// scraper notices the run (0 = disabled).
    #[arg(short, long, default_value_t = 0)]
    idle: u64,

    /// Directory for the exposition file (default: COLLECTOR_TEXTFILE_PATH
    /// env var, or /var/lib/prometheus/node-exporter).
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Exposition file name.
    #[arg(long, default_value = "crons.prom")]
    textfile: String,

    /// Metric name prefix.
    #[arg(long, default_value = "crontab")]
    metric: String,

    /// Disable metric writing entirely.
    #[arg(long)]
    no_metric: bool,

    /// The command to execute, after `--`.
    #[arg(last = true, required = true)]
    command: Vec<String>,
}

impl Cli {
    fn exporter(&self) -> Exporter {
        let mut builder = Exporter::builder()
            .filename(&self.textfile)
            .metric_prefix(&self.metric)
            .disabled(self.no_metric);
        if let Some(dir) = &self.dir {
            builder = builder.dir(dir);
        }
        builder.build()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    run(Cli::parse()).await
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let exporter = cli.exporter();
    let child_code = run_with(cli, exporter).await?;
    Ok(ExitCode::from(wrapper_exit_code(child_code)))
}

async fn run_with(cli: Cli, exporter: Exporter) -> anyhow::Result<i32> {
    let job_start = Instant::now();

    // Duration/heartbeat samples while the job runs.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reporter_handle = tokio::spawn(reporter::run(
        exporter.clone(),
        cli.name.clone(),
        job_start,
        shutdown_rx,
    ));

    exporter.increment_counter(
        "runs_total",
        &cli.name,
        &[("status", "started")],
        help::RUNS_TOTAL,
    )?;
    exporter.write_gauge("running", &cli.name, "1", help::RUNNING)?;

    let status = job::execute(&cli.command, cli.log.as_deref()).await;

    job::idle_wait(job_start, cli.idle).await;
    let final_duration = job_start.elapsed().as_secs_f64();

    let status = status?;
    let child_code = if status.success() {
        exporter.write_gauge("failed", &cli.name, "0", help::FAILED)?;
        exporter.write_gauge("exit_code", &cli.name, "0", help::EXIT_CODE)?;
        exporter.increment_counter(
            "runs_total",
            &cli.name,
            &[("status", "success")],
            help::RUNS_TOTAL,
        )?;
        0
    } else {
        let code = status.code().unwrap_or(-1);
        warn!(job = %cli.name, code, "job failed");
        exporter.write_gauge("failed", &cli.name, "1", help::FAILED)?;
        exporter.write_gauge("exit_code", &cli.name, &code.to_string(), help::EXIT_CODE)?;
        exporter.increment_counter(
            "runs_total",
            &cli.name,
            &[("status", "failed")],
            help::RUNS_TOTAL,
        )?;
        code
    };

    // Stop the reporter before the final samples so a late tick cannot
    // overwrite them.
    let _ = shutdown_tx.send(true);
    let _ = reporter_handle.await;

    exporter.write_gauge("running", &cli.name, "0", help::RUNNING)?;
    exporter.write_gauge(
        "duration_seconds",
        &cli.name,
        &format!("{final_duration:.2}"),
        help::DURATION,
    )?;
    exporter.write_gauge(
        "last_run_timestamp_seconds",
        &cli.name,
        &reporter::unix_timestamp().to_string(),
        help::LAST_RUN,
    )?;

    Ok(child_code)
}

/// Mirror the child's exit code where the platform allows it.
fn wrapper_exit_code(child_code: i32) -> u8 {
    u8::try_from(child_code).unwrap_or(1)
}
