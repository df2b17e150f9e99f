//! The reporting façade.
//!
//! [`ErrorReporter`] composes the message catalog, the remote logging
//! transport, the session-scoped overflow buffer, and the durable sink.
//! Remote failures are never fatal to the reporting caller: a failed
//! blocking report buffers the record and answers with a synthesized
//! FAILED outcome, and a detached report absorbs every failure into a
//! buffer-then-flush.

use crate::buffer::{InMemorySessionStore, SessionStore};
use crate::catalog::MessageCatalog;
use crate::config::{ConfigError, ReporterConfig};
use crate::outcome::ReportOutcome;
use crate::record::ErrorRecord;
use crate::sink::{DurableSink, FileSink, SinkError};
use crate::transport::{DefinitionTransport, LogTransport};
use std::error::Error as StdError;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError};
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// How a report call interacts with the remote logging service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Call the service on the caller's thread and return its outcome.
    Blocking,
    /// Fire-and-forget: hand the call to a background task and return
    /// immediately. The outcome is never surfaced to the caller; failures
    /// are observable only through the buffer and the durable sink.
    Detached,
}

/// Client-side error reporter for one application deployment and one
/// session.
///
/// Cloning is cheap and clones share the same buffer, catalog, and
/// transports.
#[derive(Clone)]
pub struct ErrorReporter {
    inner: Arc<ReporterInner>,
    runtime: Option<Handle>,
}

struct ReporterInner {
    config: ReporterConfig,
    session_id: String,
    catalog: MessageCatalog,
    transport: Arc<dyn LogTransport>,
    sink: Arc<dyn DurableSink>,
    sessions: Arc<dyn SessionStore>,
}

impl ErrorReporter {
    /// Starts building a reporter from its config and logging transport.
    pub fn builder(
        config: ReporterConfig,
        transport: Arc<dyn LogTransport>,
    ) -> ErrorReporterBuilder {
        ErrorReporterBuilder::new(config, transport)
    }

    /// Reports a caller-built record.
    ///
    /// In [`ReportMode::Blocking`] the return value is always
    /// `Ok(Some(outcome))`: the remote outcome when the call succeeded,
    /// or a synthesized FAILED outcome carrying the catalog message for
    /// the record's code after the record was buffered. In
    /// [`ReportMode::Detached`] the return value is always `Ok(None)`.
    ///
    /// The only error case is a durable-flush failure hit while making
    /// room in a full buffer, and only when `continue_on_fail` is off.
    pub fn report(
        &self,
        record: ErrorRecord,
        mode: ReportMode,
    ) -> Result<Option<ReportOutcome>, SinkError> {
        match mode {
            ReportMode::Blocking => self.inner.commit_blocking(record).map(Some),
            ReportMode::Detached => {
                self.spawn_detached(record);
                Ok(None)
            }
        }
    }

    /// Reports an error identified only by its enterprise code.
    pub fn report_code(
        &self,
        code: &str,
        mode: ReportMode,
    ) -> Result<Option<ReportOutcome>, SinkError> {
        self.report(self.inner.new_record(code), mode)
    }

    /// Reports an error built from scalar fields. `None` fields render as
    /// empty strings everywhere the record is serialized.
    pub fn report_fields(
        &self,
        code: &str,
        application_error_code: Option<&str>,
        application_exception: Option<&str>,
        application_parameters: Option<&str>,
        mode: ReportMode,
    ) -> Result<Option<ReportOutcome>, SinkError> {
        let record = self
            .inner
            .new_record(code)
            .with_application_error_code(application_error_code.unwrap_or_default())
            .with_application_exception(application_exception.unwrap_or_default())
            .with_application_parameters(application_parameters.unwrap_or_default());
        self.report(record, mode)
    }

    /// Reports a caught error. `operation` names the operation that was
    /// executing when the error was raised; the error's display text
    /// becomes the exception field and its source chain the parameters.
    pub fn report_error(
        &self,
        code: &str,
        operation: &str,
        error: &dyn StdError,
        mode: ReportMode,
    ) -> Result<Option<ReportOutcome>, SinkError> {
        let record = self
            .inner
            .new_record(code)
            .with_application_error_code(operation)
            .with_application_exception(error.to_string())
            .with_application_parameters(source_chain(error));
        self.report(record, mode)
    }

    /// Writes the session's buffered records to the durable sink.
    ///
    /// The buffer is left intact; only the overflow path clears it. With
    /// `continue_on_fail` set (the default) a write failure is swallowed
    /// and logged; otherwise it propagates.
    pub fn flush_to_disk(&self) -> Result<(), SinkError> {
        match self.inner.flush_session() {
            Ok(Some(path)) => {
                debug!(path = %path.display(), "manual cache flush complete");
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) if self.inner.config.continue_on_fail => {
                warn!(error = %err, "manual cache flush failed, continuing");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// The session this reporter buffers under.
    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    /// The message catalog loaded at construction.
    pub fn catalog(&self) -> &MessageCatalog {
        &self.inner.catalog
    }

    fn spawn_detached(&self, record: ErrorRecord) {
        let inner = Arc::clone(&self.inner);
        let task = move || inner.complete_detached(record);
        match &self.runtime {
            Some(handle) => {
                let _ = handle.spawn_blocking(task);
            }
            // No runtime available: run the completion on a plain thread
            // so fire-and-forget still works in synchronous hosts.
            None => {
                let _ = std::thread::spawn(task);
            }
        }
    }
}

impl ReporterInner {
    fn new_record(&self, code: &str) -> ErrorRecord {
        ErrorRecord::new(code)
            .with_application_name(&self.config.application_name)
            .with_application_server(&self.config.application_server)
    }

    fn commit_blocking(&self, record: ErrorRecord) -> Result<ReportOutcome, SinkError> {
        match self.transport.submit(&record) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                warn!(
                    code = %record.enterprise_code,
                    error = %err,
                    "remote log call failed, buffering record"
                );
                let code = record.enterprise_code.clone();
                self.buffer_record(record)?;
                Ok(ReportOutcome::failed(&code, self.catalog.lookup(&code)))
            }
        }
    }

    /// Completion body for a detached report. Every failure here is
    /// absorbed: no caller is listening.
    fn complete_detached(&self, record: ErrorRecord) {
        match self.transport.submit(&record) {
            Ok(outcome) => {
                debug!(
                    code = %outcome.code,
                    status = %outcome.status,
                    "detached report acknowledged"
                );
            }
            Err(err) => {
                warn!(
                    code = %record.enterprise_code,
                    error = %err,
                    "detached report failed, buffering and flushing"
                );
                if let Err(buffer_err) = self.buffer_record(record) {
                    warn!(error = %buffer_err, "buffering during detached completion failed");
                }
                if let Err(flush_err) = self.flush_session() {
                    warn!(error = %flush_err, "flush during detached completion failed");
                }
            }
        }
    }

    /// Places a record in the session buffer, flushing and clearing the
    /// buffer first when it is at capacity.
    ///
    /// A flush failure with `continue_on_fail` off propagates before the
    /// clear-and-append happens: the buffer keeps its old records and the
    /// new record is dropped.
    fn buffer_record(&self, record: ErrorRecord) -> Result<(), SinkError> {
        let cache = self.sessions.get_or_install(&self.session_id);
        let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);

        if cache.len() >= self.config.log_cache_size {
            match self
                .sink
                .flush(&self.config.application_name, cache.records())
            {
                Ok(path) => {
                    debug!(
                        path = %path.display(),
                        records = cache.len(),
                        "overflow flush complete"
                    );
                }
                Err(err) if self.config.continue_on_fail => {
                    warn!(
                        error = %err,
                        records = cache.len(),
                        "overflow flush failed, discarding buffered records"
                    );
                }
                Err(err) => return Err(err),
            }
            cache.clear();
        }

        cache.push(record);
        Ok(())
    }

    /// Writes the session buffer to the sink without clearing it.
    /// Returns the destination, or `None` when nothing is buffered.
    fn flush_session(&self) -> Result<Option<PathBuf>, SinkError> {
        let Some(cache) = self.sessions.get(&self.session_id) else {
            return Ok(None);
        };
        let cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
        if cache.is_empty() {
            return Ok(None);
        }
        self.sink
            .flush(&self.config.application_name, cache.records())
            .map(Some)
    }
}

fn source_chain(error: &dyn StdError) -> String {
    let mut parts = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        parts.push(cause.to_string());
        current = cause.source();
    }
    parts.join("; ")
}

/// Builder for [`ErrorReporter`].
pub struct ErrorReporterBuilder {
    config: ReporterConfig,
    transport: Arc<dyn LogTransport>,
    definitions: Option<Arc<dyn DefinitionTransport>>,
    sink: Option<Arc<dyn DurableSink>>,
    sessions: Option<Arc<dyn SessionStore>>,
    session_id: Option<String>,
    runtime: Option<Handle>,
}

impl ErrorReporterBuilder {
    fn new(config: ReporterConfig, transport: Arc<dyn LogTransport>) -> Self {
        Self {
            config,
            transport,
            definitions: None,
            sink: None,
            sessions: None,
            session_id: None,
            runtime: None,
        }
    }

    /// Definition-list service used to load the message catalog once at
    /// build time. Without one the reporter starts with the fallback
    /// catalog.
    #[must_use]
    pub fn definitions(mut self, transport: Arc<dyn DefinitionTransport>) -> Self {
        self.definitions = Some(transport);
        self
    }

    /// Durable sink override. Defaults to a [`FileSink`] rooted at the
    /// config's `base_path`.
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn DurableSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Session store override. Defaults to an in-memory store private to
    /// this reporter.
    #[must_use]
    pub fn session_store(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Session identifier the host obtained for the current caller.
    /// Defaults to a fresh UUID, giving the reporter a private session.
    #[must_use]
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Tokio runtime handle for detached reports. Defaults to the
    /// current runtime if the builder runs inside one; without any
    /// handle, detached reports fall back to plain threads.
    #[must_use]
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Validates the config, loads the message catalog, and builds the
    /// reporter.
    pub fn build(self) -> Result<ErrorReporter, ConfigError> {
        self.config.validate()?;

        let catalog = match &self.definitions {
            Some(definitions) => MessageCatalog::load(definitions.as_ref(), self.config.application_id),
            None => MessageCatalog::fallback(),
        };
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(FileSink::new(self.config.base_path.clone())));
        let sessions = self
            .sessions
            .unwrap_or_else(|| Arc::new(InMemorySessionStore::new()));
        let session_id = self
            .session_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let runtime = self.runtime.or_else(|| Handle::try_current().ok());

        Ok(ErrorReporter {
            inner: Arc::new(ReporterInner {
                config: self.config,
                session_id,
                catalog,
                transport: self.transport,
                sink,
                sessions,
            }),
            runtime,
        })
    }
}
