//! The error report payload.
//!
//! An [`ErrorRecord`] is built once, at the moment a report call is made,
//! and never mutated afterwards. Optional fields are plain strings that
//! default to empty so serialization and the durable log line never have
//! to deal with absent values.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Timestamp rendering used in the durable cache line.
const CACHE_LINE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single error report.
///
/// `enterprise_code` identifies the error class and must not be empty;
/// every other field may be empty. The record is immutable once built:
/// the `with_*` setters consume and return the value builder-style, and
/// no mutation API exists after that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Stable identifier naming the class of error.
    pub enterprise_code: String,
    /// Caller subsystem identifier (e.g. the originating operation).
    #[serde(default)]
    pub application_error_code: String,
    /// Reporting application, fixed per deployment.
    #[serde(default)]
    pub application_name: String,
    /// Free-text description of the failure.
    #[serde(default)]
    pub application_exception: String,
    /// Free-text context accompanying the failure.
    #[serde(default)]
    pub application_parameters: String,
    /// Host identifier of the reporting machine.
    #[serde(default)]
    pub application_server: String,
    /// Set when the record is constructed.
    pub timestamp: DateTime<Local>,
}

impl ErrorRecord {
    /// Creates a record for the given enterprise error code, stamped with
    /// the current local time. All other fields start empty.
    ///
    /// An empty code is a caller bug, caught by a debug assertion. Release
    /// builds pass the record through; the remote service and the durable
    /// line tolerate an empty code, it just identifies nothing.
    pub fn new(enterprise_code: impl Into<String>) -> Self {
        let enterprise_code = enterprise_code.into();
        debug_assert!(
            !enterprise_code.is_empty(),
            "enterprise_code must not be empty"
        );
        Self {
            enterprise_code,
            application_error_code: String::new(),
            application_name: String::new(),
            application_exception: String::new(),
            application_parameters: String::new(),
            application_server: String::new(),
            timestamp: Local::now(),
        }
    }

    /// Sets the caller subsystem identifier.
    #[must_use]
    pub fn with_application_error_code(mut self, value: impl Into<String>) -> Self {
        self.application_error_code = value.into();
        self
    }

    /// Sets the reporting application name.
    #[must_use]
    pub fn with_application_name(mut self, value: impl Into<String>) -> Self {
        self.application_name = value.into();
        self
    }

    /// Sets the free-text failure description.
    #[must_use]
    pub fn with_application_exception(mut self, value: impl Into<String>) -> Self {
        self.application_exception = value.into();
        self
    }

    /// Sets the free-text failure context.
    #[must_use]
    pub fn with_application_parameters(mut self, value: impl Into<String>) -> Self {
        self.application_parameters = value.into();
        self
    }

    /// Sets the reporting host identifier.
    #[must_use]
    pub fn with_application_server(mut self, value: impl Into<String>) -> Self {
        self.application_server = value.into();
        self
    }

    /// Renders the record as one durable cache log line.
    ///
    /// Fields are joined with `" | "` and the line is terminated by CRLF:
    ///
    /// ```text
    /// Error Cache Entry: {code} | {app_error_code} | {app_name} | {exception} | {parameters} | {server} | {timestamp}
    /// ```
    pub fn cache_line(&self) -> String {
        format!(
            "Error Cache Entry: {} | {} | {} | {} | {} | {} | {}\r\n",
            self.enterprise_code,
            self.application_error_code,
            self.application_name,
            self.application_exception,
            self.application_parameters,
            self.application_server,
            self.timestamp.format(CACHE_LINE_TIME_FORMAT),
        )
    }
}
