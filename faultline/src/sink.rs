//! Durable flush destination.
//!
//! A flush serializes the buffered records in insertion order, one cache
//! line each, and writes the whole text to a freshly named destination.
//! Flushes never append to a prior destination.

use crate::record::ErrorRecord;
use chrono::{DateTime, Datelike, Local, Timelike};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// A durable write failed.
#[derive(Debug, Error)]
#[error("failed to write cache log {path}")]
pub struct SinkError {
    /// Destination that could not be opened or written.
    pub path: PathBuf,
    #[source]
    source: std::io::Error,
}

impl SinkError {
    /// A synthetic permission-denied failure for `path`. Used by mock
    /// sinks; real sinks wrap the io error they hit.
    pub fn denied(path: PathBuf) -> Self {
        Self {
            path,
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "write denied"),
        }
    }
}

/// Destination for one-shot dumps of the overflow buffer.
pub trait DurableSink: Send + Sync {
    /// Writes `records` in insertion order to a new destination and
    /// returns its path.
    fn flush(&self, application_name: &str, records: &[ErrorRecord]) -> Result<PathBuf, SinkError>;
}

/// File-backed sink writing one `.txt` log per flush under a base
/// directory.
///
/// Destination names carry second-resolution timestamp components
/// (`{app}_{day}-{month}-{year}-{hour}_{minute}_{second}.txt`), so two
/// flushes within the same second collide and the second write overwrites
/// the first. Known edge case, not remediated.
#[derive(Debug, Clone)]
pub struct FileSink {
    base_path: PathBuf,
}

impl FileSink {
    /// Creates a sink rooted at `base_path`. The directory must already
    /// exist; a missing directory surfaces as a write failure at flush
    /// time.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Computes the destination for a flush at `now`.
    ///
    /// Components are rendered unpadded, matching the historical log
    /// naming scheme consumers already parse.
    pub fn destination(&self, application_name: &str, now: DateTime<Local>) -> PathBuf {
        self.base_path.join(format!(
            "{}_{}-{}-{}-{}_{}_{}.txt",
            application_name,
            now.day(),
            now.month(),
            now.year(),
            now.hour(),
            now.minute(),
            now.second(),
        ))
    }

    /// The configured base directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl DurableSink for FileSink {
    fn flush(&self, application_name: &str, records: &[ErrorRecord]) -> Result<PathBuf, SinkError> {
        let path = self.destination(application_name, Local::now());
        let body: String = records.iter().map(ErrorRecord::cache_line).collect();
        fs::write(&path, body).map_err(|source| SinkError {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), records = records.len(), "flushed error cache");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(code: &str) -> ErrorRecord {
        ErrorRecord::new(code).with_application_name("Lockbox")
    }

    #[test]
    fn test_destination_name_components_are_unpadded() {
        let sink = FileSink::new("/var/log/faultline");
        let now = Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 2).unwrap();
        let path = sink.destination("Lockbox", now);
        assert_eq!(
            path,
            PathBuf::from("/var/log/faultline/Lockbox_7-3-2026-9_5_2.txt")
        );
    }

    #[test]
    fn test_flush_writes_records_in_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());

        let path = sink
            .flush("Lockbox", &[record("A"), record("B")])
            .unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        let a_at = body.find("Error Cache Entry: A |").unwrap();
        let b_at = body.find("Error Cache Entry: B |").unwrap();
        assert!(a_at < b_at);
        assert_eq!(body.matches("\r\n").count(), 2);
    }

    #[test]
    fn test_flush_of_empty_buffer_writes_empty_destination() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());
        let path = sink.flush("Lockbox", &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_flush_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-subdir");
        let sink = FileSink::new(&missing);

        let err = sink.flush("Lockbox", &[record("A")]).unwrap_err();
        assert!(err.path.starts_with(&missing));
    }

    #[test]
    fn test_repeated_flush_produces_distinct_or_overwritten_destination() {
        // Within one second the destinations collide and the second flush
        // overwrites; across seconds they are distinct. Either way the
        // last flush's content is what the destination holds.
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());

        sink.flush("Lockbox", &[record("A")]).unwrap();
        let second = sink.flush("Lockbox", &[record("B")]).unwrap();

        let body = std::fs::read_to_string(&second).unwrap();
        assert!(body.contains("Error Cache Entry: B |"));
    }
}
