//! Reporter configuration.
//!
//! One deployment differs from another only in its identity values
//! (application name, application id, log destination), so those live in
//! a config struct supplied per reporter instead of compiled-in
//! constants. Environment overrides use `FAULTLINE_`-prefixed variables;
//! parse failures are collected rather than fatal so all issues can be
//! reported at once.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default overflow buffer capacity.
pub const DEFAULT_LOG_CACHE_SIZE: usize = 10;

/// Environment variable prefix.
const ENV_PREFIX: &str = "FAULTLINE_";

/// Errors found while parsing environment overrides.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Variable value could not be parsed as the expected type.
    #[error("invalid value for {var}: expected {expected}, got '{value}'")]
    InvalidValue {
        var: String,
        expected: String,
        value: String,
    },

    /// Numeric value outside the accepted range.
    #[error("value out of range for {var}: {value} (valid: {min}..={max})")]
    OutOfRange {
        var: String,
        value: String,
        min: String,
        max: String,
    },
}

/// Errors found by startup validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Application name is required for destination naming and the RPC
    /// payload.
    #[error("application_name must not be empty")]
    EmptyApplicationName,

    /// A zero-capacity cache would flush on every buffered record.
    #[error("log_cache_size must be at least 1")]
    ZeroCacheSize,
}

/// Per-deployment identity and policy for one reporter.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Reporting application, fixed per deployment.
    pub application_name: String,
    /// Application identifier on the definition-list service.
    pub application_id: u32,
    /// Host identifier stamped on every record.
    pub application_server: String,
    /// Directory receiving durable cache flushes.
    pub base_path: PathBuf,
    /// Overflow buffer capacity.
    pub log_cache_size: usize,
    /// When true (the default), durable-flush failures are swallowed;
    /// when false they propagate to the caller.
    pub continue_on_fail: bool,
}

impl ReporterConfig {
    /// Creates a config for one application with default policy values.
    pub fn new(application_name: impl Into<String>, application_id: u32) -> Self {
        Self {
            application_name: application_name.into(),
            application_id,
            application_server: default_server_name(),
            base_path: PathBuf::from("."),
            log_cache_size: DEFAULT_LOG_CACHE_SIZE,
            continue_on_fail: true,
        }
    }

    /// Sets the flush destination directory.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Sets the overflow buffer capacity.
    #[must_use]
    pub fn with_log_cache_size(mut self, size: usize) -> Self {
        self.log_cache_size = size;
        self
    }

    /// Sets the swallow-vs-propagate policy for flush failures.
    #[must_use]
    pub fn with_continue_on_fail(mut self, continue_on_fail: bool) -> Self {
        self.continue_on_fail = continue_on_fail;
        self
    }

    /// Sets the reporting host identifier.
    #[must_use]
    pub fn with_application_server(mut self, server: impl Into<String>) -> Self {
        self.application_server = server.into();
        self
    }

    /// Applies `FAULTLINE_*` environment overrides in place.
    ///
    /// Recognized variables: `FAULTLINE_LOG_CACHE_SIZE`,
    /// `FAULTLINE_CONTINUE_ON_FAIL`, `FAULTLINE_BASE_PATH`,
    /// `FAULTLINE_APPLICATION_SERVER`. Invalid values leave the current
    /// setting untouched and are returned as [`EnvError`]s.
    pub fn apply_env(&mut self) -> Vec<EnvError> {
        let mut errors = Vec::new();

        if let Some(value) = read_var("LOG_CACHE_SIZE") {
            match value.parse::<usize>() {
                Ok(n) if n >= 1 => self.log_cache_size = n,
                Ok(n) => errors.push(EnvError::OutOfRange {
                    var: var_name("LOG_CACHE_SIZE"),
                    value: n.to_string(),
                    min: "1".to_string(),
                    max: usize::MAX.to_string(),
                }),
                Err(_) => errors.push(EnvError::InvalidValue {
                    var: var_name("LOG_CACHE_SIZE"),
                    expected: "unsigned integer".to_string(),
                    value,
                }),
            }
        }

        if let Some(value) = read_var("CONTINUE_ON_FAIL") {
            match parse_bool(&value) {
                Some(flag) => self.continue_on_fail = flag,
                None => errors.push(EnvError::InvalidValue {
                    var: var_name("CONTINUE_ON_FAIL"),
                    expected: "boolean (true/false/1/0/yes/no)".to_string(),
                    value,
                }),
            }
        }

        if let Some(value) = read_var("BASE_PATH") {
            self.base_path = PathBuf::from(value);
        }

        if let Some(value) = read_var("APPLICATION_SERVER") {
            self.application_server = value;
        }

        errors
    }

    /// Checks the config for values that would misbehave at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_name.is_empty() {
            return Err(ConfigError::EmptyApplicationName);
        }
        if self.log_cache_size == 0 {
            return Err(ConfigError::ZeroCacheSize);
        }
        Ok(())
    }
}

fn var_name(name: &str) -> String {
    format!("{ENV_PREFIX}{name}")
}

fn read_var(name: &str) -> Option<String> {
    env::var(var_name(name)).ok()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Host identifier of the reporting machine, from the environment the
/// way init systems and shells expose it. Falls back to a fixed marker
/// rather than failing construction.
fn default_server_name() -> String {
    env::var("HOSTNAME")
        .or_else(|_| env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "unknown-host".to_string())
}
