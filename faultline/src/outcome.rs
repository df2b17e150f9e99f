//! Result of a remote logging call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status reported by the remote logging service.
///
/// The wire form is `OK` / `FAILED`. The service's default status is `OK`;
/// [`Default`] mirrors that so a freshly constructed outcome matches what
/// the service returns for an accepted report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    /// The report was accepted.
    #[default]
    Ok,
    /// The report was rejected or could not be recorded.
    Failed,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Outcome of one report call: a status plus the error code it concerned
/// and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOutcome {
    /// Accepted or failed.
    pub status: ReportStatus,
    /// The enterprise error code the report concerned.
    pub code: String,
    /// Human-readable message for the user.
    pub message: String,
}

impl ReportOutcome {
    /// An accepted outcome.
    pub fn ok(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::Ok,
            code: code.into(),
            message: message.into(),
        }
    }

    /// A failed outcome.
    pub fn failed(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::Failed,
            code: code.into(),
            message: message.into(),
        }
    }

    /// True when the report was accepted.
    pub fn is_ok(&self) -> bool {
        self.status == ReportStatus::Ok
    }
}
