//! Well-known system error codes.
//!
//! These codes are shared by every deployment and are defined as a
//! convention on the remote definition service. Application-specific
//! codes belong to the caller and are passed through as plain strings;
//! only the `SYS_*` family is compiled in because the reporter itself
//! depends on it (in particular [`SYS_LOGGING_FAILURE`], which anchors
//! the catalog fallback).

/// Catch-all system prefix.
pub const SYS: &str = "SYS";

/// Diagnostic message routed through the error channel.
pub const SYS_DEBUG_MESSAGE: &str = "SYS_DEBUG_MESSAGE";

/// Unclassified exception raised by application code.
pub const SYS_GENERIC_EXCEPTION: &str = "SYS_GENERIC_EXCEPTION";

/// Payload failed XML validation.
pub const SYS_INVALID_XML: &str = "SYS_INVALID_XML";

/// Informational log message routed through the error channel.
pub const SYS_LOG_MESSAGE: &str = "SYS_LOG_MESSAGE";

/// The error-reporting pipeline itself failed. The message catalog
/// guarantees a definition for this code even when the definition
/// service is unreachable.
pub const SYS_LOGGING_FAILURE: &str = "SYS_LOGGING_FAILURE";

/// Null/absent object where a value was required.
pub const SYS_NULL_OBJECT_REFERENCE: &str = "SYS_NULL_OBJECT_REFERENCE";

/// Synthetic code reserved for integration tests.
pub const SYS_TEST_ERROR: &str = "SYS_TEST_ERROR";

/// Error that could not be classified at all.
pub const SYS_UNKNOWN_ERROR: &str = "SYS_UNKNOWN_ERROR";
