//! End-to-end reporter tests against the real file sink.

mod common;

use chrono::{Local, TimeZone};
use faultline::mock::MockLogTransport;
use faultline::{
    ErrorRecord, ErrorReporter, FileSink, ReportMode, ReportStatus, ReporterConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn reporter(dir: &TempDir, transport: Arc<MockLogTransport>) -> ErrorReporter {
    let config = ReporterConfig::new("Lockbox", 3)
        .with_base_path(dir.path())
        .with_log_cache_size(2);
    ErrorReporter::builder(config, transport)
        .session_id("e2e-session")
        .build()
        .unwrap()
}

fn cache_files(dir: &TempDir) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    files.sort();
    files
}

fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("condition not met within deadline");
}

#[test]
fn test_overflowing_buffer_lands_on_disk() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let reporter = reporter(&dir, Arc::new(MockLogTransport::unavailable()));

    // Capacity is 2: A and B buffer quietly, C forces the flush.
    for code in ["A", "B"] {
        let outcome = reporter
            .report_code(code, ReportMode::Blocking)
            .unwrap()
            .unwrap();
        assert_eq!(outcome.status, ReportStatus::Failed);
    }
    assert!(cache_files(&dir).is_empty());

    reporter.report_code("C", ReportMode::Blocking).unwrap();

    let files = cache_files(&dir);
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("Lockbox_"), "unexpected file name {name}");
    assert!(name.ends_with(".txt"));

    let content = std::fs::read_to_string(&files[0]).unwrap();
    let lines: Vec<&str> = content.split_terminator("\r\n").collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Error Cache Entry: A | "));
    assert!(lines[1].starts_with("Error Cache Entry: B | "));
    // C stayed in memory and was not written.
    assert!(!content.contains("Error Cache Entry: C"));
}

#[test]
fn test_manual_flush_writes_buffer_and_keeps_it() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let reporter = reporter(&dir, Arc::new(MockLogTransport::unavailable()));

    reporter.report_code("A", ReportMode::Blocking).unwrap();
    reporter.flush_to_disk().unwrap();

    let files = cache_files(&dir);
    assert_eq!(files.len(), 1);
    let first = std::fs::read_to_string(&files[0]).unwrap();
    assert!(first.starts_with("Error Cache Entry: A | "));

    // The buffer was not cleared: a second flush still includes A.
    reporter.report_code("B", ReportMode::Blocking).unwrap();
    reporter.flush_to_disk().unwrap();
    let latest = cache_files(&dir);
    let content = std::fs::read_to_string(latest.last().unwrap()).unwrap();
    assert!(content.contains("Error Cache Entry: A | "));
    assert!(content.contains("Error Cache Entry: B | "));
}

#[test]
fn test_reports_succeed_again_once_transport_recovers() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let transport = Arc::new(MockLogTransport::fail_first(2));
    let reporter = reporter(&dir, Arc::clone(&transport));

    for code in ["A", "B"] {
        let outcome = reporter
            .report_code(code, ReportMode::Blocking)
            .unwrap()
            .unwrap();
        assert_eq!(outcome.status, ReportStatus::Failed);
    }

    // Transport is back. New reports go through; the buffered records
    // stay put until an overflow or a manual flush drains them.
    let outcome = reporter
        .report_code("C", ReportMode::Blocking)
        .unwrap()
        .unwrap();
    assert_eq!(outcome.status, ReportStatus::Ok);
    assert!(cache_files(&dir).is_empty());

    reporter.flush_to_disk().unwrap();
    let files = cache_files(&dir);
    assert_eq!(files.len(), 1);
    let content = std::fs::read_to_string(&files[0]).unwrap();
    assert!(content.contains("Error Cache Entry: A | "));
    assert!(content.contains("Error Cache Entry: B | "));
    assert!(!content.contains("Error Cache Entry: C"));
}

#[test]
fn test_detached_failure_ends_up_on_disk() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let reporter = reporter(&dir, Arc::new(MockLogTransport::unavailable()));

    assert!(reporter
        .report_code("A", ReportMode::Detached)
        .unwrap()
        .is_none());

    wait_until(|| !cache_files(&dir).is_empty());
    let files = cache_files(&dir);
    let content = std::fs::read_to_string(&files[0]).unwrap();
    assert!(content.starts_with("Error Cache Entry: A | "));
}

#[test]
fn test_sink_writes_exact_cache_entry_bytes() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let sink = FileSink::new(dir.path());

    let timestamp = Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 2).unwrap();
    let mut record = ErrorRecord::new("APP_DB_ERROR")
        .with_application_error_code("load_feed_file")
        .with_application_name("Lockbox")
        .with_application_exception("connection reset")
        .with_application_parameters("feed=nightly")
        .with_application_server("app-07");
    record.timestamp = timestamp;

    // Naming uses the flush time, checked here with a pinned clock.
    assert_eq!(
        sink.destination("Lockbox", timestamp),
        dir.path().join("Lockbox_7-3-2026-9_5_2.txt")
    );

    let path = faultline::DurableSink::flush(&sink, "Lockbox", std::slice::from_ref(&record))
        .unwrap();
    let content = std::fs::read(&path).unwrap();
    assert_eq!(
        content,
        b"Error Cache Entry: APP_DB_ERROR | load_feed_file | Lockbox | \
          connection reset | feed=nightly | app-07 | 2026-03-07 09:05:02\r\n"
    );
}
