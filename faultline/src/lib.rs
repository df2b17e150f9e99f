//! Client-side error reporting with bounded overflow buffering.
//!
//! Applications report errors by enterprise code through an
//! [`ErrorReporter`], which forwards each report to a remote logging
//! service. When the service is unreachable the record lands in a
//! bounded per-session in-memory cache; when the cache is full it is
//! written to a durable file sink and cleared before the new record is
//! admitted. Reporting never takes the calling application down: in the
//! worst case a blocking caller gets a synthesized FAILED outcome and a
//! detached (fire-and-forget) caller gets nothing at all.
//!
//! The remote seams are the [`LogTransport`] and [`DefinitionTransport`]
//! traits; hosts plug in their RPC client of choice. [`transport`] holds
//! the traits, [`mock`] ships in-memory doubles for tests and local
//! development.

pub mod buffer;
pub mod catalog;
pub mod codes;
pub mod config;
pub mod mock;
pub mod outcome;
pub mod record;
pub mod reporter;
pub mod sink;
pub mod transport;

pub use buffer::{ErrorCache, InMemorySessionStore, SessionStore, SharedCache};
pub use catalog::{MessageCatalog, FALLBACK_DEFINITION_MESSAGE};
pub use config::{ConfigError, EnvError, ReporterConfig, DEFAULT_LOG_CACHE_SIZE};
pub use outcome::{ReportOutcome, ReportStatus};
pub use record::ErrorRecord;
pub use reporter::{ErrorReporter, ErrorReporterBuilder, ReportMode};
pub use sink::{DurableSink, FileSink, SinkError};
pub use transport::{DefinitionTransport, ErrorDefinition, LogTransport, TransportError};
