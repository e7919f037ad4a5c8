//! End-to-end exporter tests against the real filesystem and sidecar
//! file locks, the production configuration.

use std::sync::Arc;
use std::thread;

use cronpulse_exporter::{Exporter, help};

fn disk_exporter(dir: &std::path::Path) -> Exporter {
    Exporter::builder().dir(dir).build()
}

/// Every non-comment line must match `<name>{<labels>} <value>` and every
/// metric name must carry exactly one HELP and one TYPE line.
fn assert_valid_exposition(content: &str) {
    let mut names = std::collections::HashSet::new();
    for line in content.lines() {
        if let Some(rest) = line.strip_prefix("# HELP ") {
            let name = rest.split(' ').next().unwrap();
            assert!(names.insert(name), "duplicate HELP for {name}");
            continue;
        }
        if line.starts_with("# TYPE ") {
            continue;
        }
        let open = line.find('{').expect("sample line has labels");
        let close = line.rfind('}').expect("sample line closes labels");
        assert!(close > open);
        let value = &line[close + 1..];
        assert!(value.starts_with(' '), "value separated by space: {line}");
    }
    for name in names {
        assert_eq!(
            content.lines().filter(|l| l.starts_with(&format!("# TYPE {name} "))).count(),
            1,
            "exactly one TYPE for {name}"
        );
    }
}

#[test]
fn full_job_lifecycle_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = disk_exporter(dir.path());

    // Start.
    exporter
        .increment_counter("runs_total", "nightly_etl", &[("status", "started")], help::RUNS_TOTAL)
        .unwrap();
    exporter.write_gauge("running", "nightly_etl", "1", help::RUNNING).unwrap();

    // Periodic reporter samples.
    exporter.write_gauge("duration_seconds", "nightly_etl", "1.00", help::DURATION).unwrap();
    exporter
        .write_gauge("last_run_timestamp_seconds", "nightly_etl", "1700000000", help::LAST_RUN)
        .unwrap();

    // Successful finish.
    exporter.write_gauge("failed", "nightly_etl", "0", help::FAILED).unwrap();
    exporter.write_gauge("exit_code", "nightly_etl", "0", help::EXIT_CODE).unwrap();
    exporter
        .increment_counter("runs_total", "nightly_etl", &[("status", "success")], help::RUNS_TOTAL)
        .unwrap();
    exporter.write_gauge("running", "nightly_etl", "0", help::RUNNING).unwrap();
    exporter.write_gauge("duration_seconds", "nightly_etl", "3.52", help::DURATION).unwrap();

    let content = std::fs::read_to_string(exporter.exporter_path()).unwrap();
    assert_valid_exposition(&content);

    assert!(content.contains("crontab_runs_total{name=\"nightly_etl\",status=\"started\"} 1\n"));
    assert!(content.contains("crontab_runs_total{name=\"nightly_etl\",status=\"success\"} 1\n"));
    assert!(content.contains("crontab_running{name=\"nightly_etl\"} 0\n"));
    assert!(content.contains("crontab_failed{name=\"nightly_etl\"} 0\n"));
    assert!(content.contains("crontab_exit_code{name=\"nightly_etl\"} 0\n"));
    assert!(content.contains("crontab_duration_seconds{name=\"nightly_etl\"} 3.52\n"));

    // The duration gauge was overwritten, not duplicated.
    assert_eq!(
        content.lines().filter(|l| l.starts_with("crontab_duration_seconds{")).count(),
        1
    );
}

#[test]
fn two_jobs_share_one_file_without_clobbering() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = disk_exporter(dir.path());

    exporter.write_gauge("running", "job_a", "1", help::RUNNING).unwrap();
    exporter.write_gauge("running", "job_b", "1", help::RUNNING).unwrap();
    exporter.write_gauge("running", "job_a", "0", help::RUNNING).unwrap();

    let content = std::fs::read_to_string(exporter.exporter_path()).unwrap();
    assert_valid_exposition(&content);
    assert!(content.contains("crontab_running{name=\"job_a\"} 0\n"));
    assert!(content.contains("crontab_running{name=\"job_b\"} 1\n"));
    assert_eq!(content.matches("# TYPE crontab_running ").count(), 1);
}

#[test]
fn concurrent_writers_with_file_locks_lose_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = Arc::new(dir.path().to_path_buf());

    // Each thread builds its own exporter, the way separate process
    // invocations would; they only share the sidecar lock on disk.
    let threads = 4;
    let per_thread = 10;
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let path = path.clone();
            thread::spawn(move || {
                let exporter = disk_exporter(&path);
                for _ in 0..per_thread {
                    exporter
                        .increment_counter("runs_total", "contended", &[], help::RUNS_TOTAL)
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let exporter = disk_exporter(&path);
    let content = std::fs::read_to_string(exporter.exporter_path()).unwrap();
    assert_valid_exposition(&content);
    let expected = format!("crontab_runs_total{{name=\"contended\"}} {}\n", threads * per_thread);
    assert!(content.contains(&expected), "content was:\n{content}");
}
