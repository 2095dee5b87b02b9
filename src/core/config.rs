//! Logger configuration assembled from environment signals
//!
//! `LoggerConfig` is built once at startup, either from the process
//! environment or from any key lookup, and handed to `Logger::from_config`.
//! The logger itself never reads the environment.

use super::error::{LoggerError, Result};
use super::global_tags::{process_component, GlobalTags, DEFAULT_APPLICATION};
use super::log_level::LogLevel;
use super::output_format::OutputFormat;
use std::path::PathBuf;

/// Selects development or production output
pub const LOGGER_ENVIRONMENT: &str = "LOGGER_ENVIRONMENT";
/// Optional file that receives a copy of every entry
pub const LOG_OUTPUT_FILE: &str = "LOG_OUTPUT_FILE";
/// Optional initial severity threshold
pub const LOG_LEVEL: &str = "LOG_LEVEL";
/// Boolean flag that disables stack trace capture
pub const NO_STACKTRACE: &str = "NO_STACKTRACE";

/// Output mode of the logger, fixed at construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Colored plain-text lines with the record folded into the message
    Development,
    /// JSON lines with typed fields
    #[default]
    Production,
}

impl Environment {
    /// `DEVELOPMENT` and `DEV` select development, anything else production
    pub fn parse(value: &str) -> Self {
        match value {
            "DEVELOPMENT" | "DEV" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }

    /// Threshold used when no level override is configured
    pub fn default_level(self) -> LogLevel {
        match self {
            Environment::Development => LogLevel::Debug,
            Environment::Production => LogLevel::Info,
        }
    }

    /// Lowest level that carries a stack trace by default
    pub fn default_stack_trace_level(self) -> LogLevel {
        match self {
            Environment::Development => LogLevel::Warn,
            Environment::Production => LogLevel::Error,
        }
    }

    pub fn output_format(self) -> OutputFormat {
        match self {
            Environment::Development => OutputFormat::Text,
            Environment::Production => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub environment: Environment,
    pub output_file: Option<PathBuf>,
    /// Raw initial level; an unrecognized name is ignored
    pub level: Option<String>,
    /// Raw stack trace suppression flag
    pub no_stacktrace: Option<String>,
    pub application: String,
    pub component: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            output_file: None,
            level: None,
            no_stacktrace: None,
            application: DEFAULT_APPLICATION.to_string(),
            component: process_component(),
        }
    }
}

impl LoggerConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup
    ///
    /// # Example
    ///
    /// ```
    /// use rosetta_logger::{Environment, LoggerConfig};
    ///
    /// let config = LoggerConfig::from_lookup(|key| match key {
    ///     "LOGGER_ENVIRONMENT" => Some("DEV".to_string()),
    ///     "LOG_LEVEL" => Some("WARN".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.environment, Environment::Development);
    /// assert_eq!(config.level.as_deref(), Some("WARN"));
    /// assert!(config.output_file.is_none());
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        Self {
            environment: non_empty(LOGGER_ENVIRONMENT)
                .map(|value| Environment::parse(&value))
                .unwrap_or_default(),
            output_file: non_empty(LOG_OUTPUT_FILE).map(PathBuf::from),
            level: non_empty(LOG_LEVEL),
            no_stacktrace: lookup(NO_STACKTRACE),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    #[must_use]
    pub fn with_no_stacktrace(mut self, flag: impl Into<String>) -> Self {
        self.no_stacktrace = Some(flag.into());
        self
    }

    #[must_use]
    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = application.into();
        self
    }

    #[must_use]
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = component.into();
        self
    }

    /// Configured level if it names a known severity, else the mode default
    pub fn initial_level(&self) -> LogLevel {
        self.level
            .as_deref()
            .and_then(|name| name.parse().ok())
            .unwrap_or_else(|| self.environment.default_level())
    }

    /// Whether stack traces are disabled.
    ///
    /// A flag that cannot be parsed is reported and treated as `false`.
    pub fn stack_traces_suppressed(&self) -> bool {
        match self.no_stacktrace.as_deref() {
            None => false,
            Some(raw) => parse_bool(NO_STACKTRACE, raw).unwrap_or_else(|e| {
                eprintln!("[LOGGER WARNING] {}", e);
                false
            }),
        }
    }

    pub fn global_tags(&self) -> GlobalTags {
        GlobalTags::new(self.application.clone(), self.component.clone())
    }
}

/// Parse a configuration flag.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their `false`
/// counterparts; any other spelling is an error.
pub fn parse_bool(component: &str, raw: &str) -> Result<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(LoggerError::config(
            component,
            format!("cannot parse bool value for [{}]", raw),
        )),
    }
}
