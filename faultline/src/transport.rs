//! Remote service seams.
//!
//! The logging service and the definition-list service are opaque RPC
//! endpoints; the reporter only depends on these two traits. Implement
//! them over whatever transport the host uses (SOAP, HTTP, message bus).
//! Both traits are object-safe and `Send + Sync` so the fire-and-forget
//! path can invoke them from a spawned task.

use crate::outcome::ReportOutcome;
use crate::record::ErrorRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a remote call.
///
/// These are never surfaced to reporting callers; the reporter absorbs
/// them into the overflow buffer (logging call) or the fallback catalog
/// (definition-list call).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The remote endpoint could not be reached.
    #[error("remote service unavailable: {0}")]
    Unavailable(String),

    /// The call did not complete within the transport's deadline.
    #[error("remote call timed out")]
    Timeout,

    /// The endpoint answered with something the client could not decode.
    #[error("remote protocol error: {0}")]
    Protocol(String),
}

/// Blocking client for the remote logging service.
///
/// `submit` sends one [`ErrorRecord`] and returns the service's outcome.
/// The reporter drives this same call in both modes: directly on the
/// caller's thread for blocking reports, and from a spawned task for
/// fire-and-forget reports.
pub trait LogTransport: Send + Sync {
    /// Submits one error record to the remote logging service.
    fn submit(&self, record: &ErrorRecord) -> Result<ReportOutcome, TransportError>;
}

/// One code/message pair from the definition-list service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDefinition {
    /// Enterprise error code.
    pub code: String,
    /// User-facing message for the code.
    pub message: String,
}

/// Blocking client for the remote definition-list service.
pub trait DefinitionTransport: Send + Sync {
    /// Fetches the full code-to-message list for one application.
    fn definitions(&self, application_id: u32) -> Result<Vec<ErrorDefinition>, TransportError>;
}
