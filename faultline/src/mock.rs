//! In-process mock transports and sinks.
//!
//! These back the crate's own tests and are exported so downstream hosts
//! can exercise their reporting paths without a reachable remote service.
//! No sockets are opened; behavior is configured per instance.

use crate::outcome::ReportOutcome;
use crate::record::ErrorRecord;
use crate::sink::{DurableSink, SinkError};
use crate::transport::{DefinitionTransport, ErrorDefinition, LogTransport, TransportError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Behavior of a [`MockLogTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogBehavior {
    /// Every submission is accepted.
    Success,
    /// Every submission fails as unavailable.
    Unavailable,
    /// Every submission times out.
    Timeout,
    /// The first N submissions fail, then submissions succeed.
    FailFirst(usize),
}

/// Mock remote logging service.
///
/// Records every submitted [`ErrorRecord`] so tests can assert on what
/// reached the wire, and answers according to the configured behavior.
#[derive(Debug)]
pub struct MockLogTransport {
    behavior: LogBehavior,
    submissions: Mutex<Vec<ErrorRecord>>,
    attempts: AtomicUsize,
}

impl MockLogTransport {
    /// A transport that accepts every submission.
    pub fn success() -> Self {
        Self::with_behavior(LogBehavior::Success)
    }

    /// A transport that rejects every submission as unavailable.
    pub fn unavailable() -> Self {
        Self::with_behavior(LogBehavior::Unavailable)
    }

    /// A transport that times out every submission.
    pub fn timeout() -> Self {
        Self::with_behavior(LogBehavior::Timeout)
    }

    /// A transport whose first `n` submissions fail as unavailable and
    /// whose later submissions succeed.
    pub fn fail_first(n: usize) -> Self {
        Self::with_behavior(LogBehavior::FailFirst(n))
    }

    fn with_behavior(behavior: LogBehavior) -> Self {
        Self {
            behavior,
            submissions: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Every record submitted so far, in call order, including failed
    /// attempts.
    pub fn submissions(&self) -> Vec<ErrorRecord> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of submit calls made.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl LogTransport for MockLogTransport {
    fn submit(&self, record: &ErrorRecord) -> Result<ReportOutcome, TransportError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());

        match self.behavior {
            LogBehavior::Success => Ok(ReportOutcome::ok(
                record.enterprise_code.clone(),
                "recorded",
            )),
            LogBehavior::Unavailable => {
                Err(TransportError::Unavailable("mock: connection refused".into()))
            }
            LogBehavior::Timeout => Err(TransportError::Timeout),
            LogBehavior::FailFirst(n) if attempt < n => {
                Err(TransportError::Unavailable("mock: connection refused".into()))
            }
            LogBehavior::FailFirst(_) => Ok(ReportOutcome::ok(
                record.enterprise_code.clone(),
                "recorded",
            )),
        }
    }
}

/// Mock definition-list service.
#[derive(Debug)]
pub struct MockDefinitionTransport {
    result: Result<Vec<ErrorDefinition>, ()>,
    calls: AtomicUsize,
}

impl MockDefinitionTransport {
    /// A transport answering with the given code/message pairs.
    pub fn with_definitions(pairs: Vec<(&str, &str)>) -> Self {
        let defs = pairs
            .into_iter()
            .map(|(code, message)| ErrorDefinition {
                code: code.to_string(),
                message: message.to_string(),
            })
            .collect();
        Self {
            result: Ok(defs),
            calls: AtomicUsize::new(0),
        }
    }

    /// A transport that fails every call as unavailable.
    pub fn unavailable() -> Self {
        Self {
            result: Err(()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of definition-list calls made.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DefinitionTransport for MockDefinitionTransport {
    fn definitions(&self, _application_id: u32) -> Result<Vec<ErrorDefinition>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.result {
            Ok(defs) => Ok(defs.clone()),
            Err(()) => Err(TransportError::Unavailable(
                "mock: definition service down".into(),
            )),
        }
    }
}

/// Recording sink capturing each flush in memory.
///
/// `fail` makes every flush report a write failure, for exercising the
/// `continue_on_fail` paths.
#[derive(Debug, Default)]
pub struct MockSink {
    fail: bool,
    flushes: Mutex<Vec<Vec<ErrorRecord>>>,
}

impl MockSink {
    /// A sink that accepts every flush.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that fails every flush.
    pub fn failing() -> Self {
        Self {
            fail: true,
            flushes: Mutex::new(Vec::new()),
        }
    }

    /// The record batches flushed so far, in call order.
    pub fn flushes(&self) -> Vec<Vec<ErrorRecord>> {
        self.flushes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of successful flushes.
    pub fn flush_count(&self) -> usize {
        self.flushes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl DurableSink for MockSink {
    fn flush(&self, application_name: &str, records: &[ErrorRecord]) -> Result<PathBuf, SinkError> {
        if self.fail {
            return Err(SinkError::denied(PathBuf::from(format!(
                "mock://{application_name}"
            ))));
        }
        self.flushes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(records.to_vec());
        Ok(PathBuf::from(format!("mock://{application_name}")))
    }
}
