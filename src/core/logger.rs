//! Main logger implementation
//!
//! A `Logger` owns the appenders, the severity threshold and the stack
//! trace policy. Every dispatch is synchronous: the record is filtered,
//! rendered for the configured environment, written to each appender and
//! flushed before the call returns.

use super::{
    appender::Appender,
    config::{Environment, LoggerConfig, NO_STACKTRACE},
    error::{LoggerError, Result},
    field_set::FieldValue,
    global_tags::GlobalTags,
    log_entry::LogEntry,
    log_level::{AtomicLevel, LogLevel},
    log_record::LogRecord,
    metrics::LoggerMetrics,
};
use crate::appenders::{ConsoleAppender, FileAppender};
use parking_lot::RwLock;
use std::any::Any;
use std::backtrace::Backtrace;

/// Message emitted in place of a missing record
pub const NIL_LOG_MESSAGE: &str = "rosetta is called with nil log message";

/// Exit status used after a FATAL entry has been written
pub const FATAL_EXIT_CODE: i32 = 1;

pub struct Logger {
    level: AtomicLevel,
    environment: Environment,
    /// Lowest level that carries a captured stack trace
    stack_trace: RwLock<Option<LogLevel>>,
    stack_traces_suppressed: bool,
    appenders: RwLock<Vec<Box<dyn Appender>>>,
    global_tags: GlobalTags,
    metrics: LoggerMetrics,
    exit_on_fatal: bool,
}

impl Logger {
    /// A production-mode logger without appenders
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::new().build()
    }

    /// Build a logger from an assembled configuration.
    ///
    /// Output goes to the console in the format of the configured
    /// environment, and additionally to `output_file` when one is set.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::FileAppenderError`] if the output file cannot
    /// be opened; logging is never silently reduced to the console.
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        let format = config.environment.output_format();
        let mut builder = LoggerBuilder::new()
            .environment(config.environment)
            .min_level(config.initial_level())
            .global_tags(config.global_tags())
            .suppress_stack_traces(config.stack_traces_suppressed())
            .appender(ConsoleAppender::new().with_output_format(format));

        if let Some(path) = &config.output_file {
            let file = FileAppender::new(path)
                .map_err(|e| LoggerError::file_appender(path.display().to_string(), e.to_string()))?
                .with_output_format(format);
            builder = builder.appender(file);
        }

        Ok(builder.build())
    }

    pub fn add_appender(&mut self, appender: Box<dyn Appender>) {
        let mut appenders = self.appenders.write();
        appenders.push(appender);
    }

    /// Replace the severity threshold by name.
    ///
    /// Accepts exactly `DEBUG`, `INFO`, `WARN`, `WARNING`, `ERROR` and `FATAL`.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidLevel`] for any other name; the current
    /// threshold is left unchanged.
    pub fn set_level(&self, name: &str) -> Result<()> {
        let level: LogLevel = name.parse()?;
        self.level.store(level);
        Ok(())
    }

    pub fn set_min_level(&self, level: LogLevel) {
        self.level.store(level);
    }

    pub fn get_level(&self) -> LogLevel {
        self.level.load()
    }

    /// Whether a record at `level` would be written
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.level.enabled(level)
    }

    /// Capture a stack trace on every entry at or above the named level.
    ///
    /// An unrecognized name, or stack traces being disabled through
    /// configuration, is reported on stderr and leaves the current policy
    /// in place.
    pub fn add_stack_trace(&self, name: &str) {
        if self.stack_traces_suppressed {
            eprintln!(
                "[LOGGER WARNING] Stack traces disabled by {}, ignoring level {}",
                NO_STACKTRACE, name
            );
            return;
        }

        match name.parse::<LogLevel>() {
            Ok(level) => *self.stack_trace.write() = Some(level),
            Err(_) => eprintln!("[LOGGER ERROR] Cannot add stack trace for level {}", name),
        }
    }

    pub fn stack_trace_level(&self) -> Option<LogLevel> {
        *self.stack_trace.read()
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn global_tags(&self) -> &GlobalTags {
        &self.global_tags
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Dispatch a record at `level`.
    ///
    /// A missing record is replaced by an ERROR entry carrying
    /// [`NIL_LOG_MESSAGE`]. A record below the threshold produces no
    /// appender call. Development mode writes the message followed by the
    /// serialized fields as one line; production mode hands typed fields,
    /// including the global tags, to the appenders.
    ///
    /// After a FATAL record is written and flushed the process exits with
    /// status [`FATAL_EXIT_CODE`], unless the logger was built with
    /// `exit_on_fatal(false)`.
    pub fn log_message(&self, level: LogLevel, record: Option<&LogRecord>) {
        let Some(record) = record else {
            self.emit(LogEntry::new(LogLevel::Error, NIL_LOG_MESSAGE));
            return;
        };

        if !self.level.enabled(level) {
            self.metrics.record_filtered();
            return;
        }

        self.report_unsupported_fields(record);

        let entry = match self.environment {
            Environment::Development => LogEntry::new(level, self.plain_message(record)),
            Environment::Production => {
                LogEntry::new(level, &record.message).with_fields(self.typed_fields(record))
            }
        };
        self.emit(entry);

        if level == LogLevel::Fatal && self.exit_on_fatal {
            std::process::exit(FATAL_EXIT_CODE);
        }
    }

    #[inline]
    pub fn debug_message(&self, record: Option<&LogRecord>) {
        self.log_message(LogLevel::Debug, record);
    }

    #[inline]
    pub fn info_message(&self, record: Option<&LogRecord>) {
        self.log_message(LogLevel::Info, record);
    }

    #[inline]
    pub fn warn_message(&self, record: Option<&LogRecord>) {
        self.log_message(LogLevel::Warn, record);
    }

    #[inline]
    pub fn error_message(&self, record: Option<&LogRecord>) {
        self.log_message(LogLevel::Error, record);
    }

    /// Dispatch at FATAL, then terminate the process (see [`log_message`](Self::log_message))
    #[inline]
    pub fn fatal_message(&self, record: Option<&LogRecord>) {
        self.log_message(LogLevel::Fatal, record);
    }

    /// Log a bare message
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.level.enabled(level) {
            self.metrics.record_filtered();
            return;
        }
        self.log_message(level, Some(&LogRecord::with_message(message)));
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Log at FATAL, then terminate the process unless built with `exit_on_fatal(false)`
    #[inline]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.write();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }

    /// Render `record`'s fields as plain text, followed by this logger's
    /// global tags unless `skip_global_tags` is set
    pub fn serialize_fields(&self, record: &LogRecord, skip_global_tags: bool) -> String {
        record.serialize_fields((!skip_global_tags).then_some(&self.global_tags))
    }

    /// Typed fields of `record` in plain-text order, followed by this
    /// logger's global tags unless `skip_global_tags` is set
    pub fn to_structured_fields(
        &self,
        record: &LogRecord,
        skip_global_tags: bool,
    ) -> Vec<(String, FieldValue)> {
        record.to_structured_fields((!skip_global_tags).then_some(&self.global_tags))
    }

    fn plain_message(&self, record: &LogRecord) -> String {
        let fields = self.serialize_fields(record, true);
        if fields.is_empty() {
            record.message.clone()
        } else {
            format!("{} {}", record.message, fields)
        }
    }

    fn typed_fields(&self, record: &LogRecord) -> Vec<(String, FieldValue)> {
        self.to_structured_fields(record, false)
            .into_iter()
            .map(|(key, value)| match value {
                FieldValue::Opaque(opaque) => (key, FieldValue::String(opaque.as_str().to_string())),
                other => (key, other),
            })
            .collect()
    }

    /// Write one ERROR entry per field whose type fell back to a string.
    ///
    /// These go straight to the appenders; they are never rendered as
    /// records themselves.
    fn report_unsupported_fields(&self, record: &LogRecord) {
        for (key, opaque) in record.fields.opaque_entries() {
            self.metrics.record_diagnostic();
            self.emit(LogEntry::new(
                LogLevel::Error,
                format!(
                    "unsupported value type {} for field {}, logged as string",
                    opaque.type_name(),
                    key
                ),
            ));
        }
    }

    /// Threshold check, stack trace policy, then a synchronous write
    fn emit(&self, mut entry: LogEntry) {
        if !self.level.enabled(entry.level) {
            self.metrics.record_filtered();
            return;
        }

        let capture_from = *self.stack_trace.read();
        if capture_from.is_some_and(|min| entry.level >= min) {
            entry = entry.with_stack_trace(Backtrace::force_capture().to_string());
        }

        let mut appenders = self.appenders.write();
        if Self::process_sync(&mut appenders, &entry) {
            self.metrics.record_dropped();
        } else {
            self.metrics.record_logged();
        }
    }

    /// Append and flush on every appender with per-appender panic isolation.
    ///
    /// Returns `true` if any appender failed.
    fn process_sync(appenders: &mut [Box<dyn Appender>], entry: &LogEntry) -> bool {
        let mut has_error = false;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(entry)?;
                appender.flush()
            }));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} ({}) failed: {}",
                        idx,
                        appender.name(),
                        e
                    );
                    has_error = true;
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} panicked: {}. \
                         Other appenders continue to function.",
                        idx,
                        panic_message(&*panic_info)
                    );
                    has_error = true;
                }
            }
        }

        has_error
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} dropped logs (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rosetta_logger::prelude::*;
///
/// let memory = MemoryAppender::new();
/// let logger = Logger::builder()
///     .environment(Environment::Development)
///     .min_level(LogLevel::Info)
///     .appender(memory.clone())
///     .build();
///
/// logger.with_field("user", "a1").info("done");
/// assert_eq!(memory.messages(), vec![r#"done user="a1""#]);
/// ```
pub struct LoggerBuilder {
    environment: Environment,
    min_level: Option<LogLevel>,
    appenders: Vec<Box<dyn Appender>>,
    global_tags: Option<GlobalTags>,
    stack_trace: Option<Option<LogLevel>>,
    suppress_stack_traces: bool,
    exit_on_fatal: bool,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            environment: Environment::default(),
            min_level: None,
            appenders: Vec::new(),
            global_tags: None,
            stack_trace: None,
            suppress_stack_traces: false,
            exit_on_fatal: true,
        }
    }

    /// Set the output mode; also picks the default threshold and stack trace level
    #[must_use = "builder methods return a new value"]
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Add an appender
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Tags appended to every structured entry; defaults to the process tags
    #[must_use = "builder methods return a new value"]
    pub fn global_tags(mut self, tags: GlobalTags) -> Self {
        self.global_tags = Some(tags);
        self
    }

    /// Lowest level that carries a stack trace, `None` for never
    #[must_use = "builder methods return a new value"]
    pub fn stack_trace(mut self, level: Option<LogLevel>) -> Self {
        self.stack_trace = Some(level);
        self
    }

    /// Disable stack traces entirely, including later `add_stack_trace` calls
    #[must_use = "builder methods return a new value"]
    pub fn suppress_stack_traces(mut self, suppress: bool) -> Self {
        self.suppress_stack_traces = suppress;
        self
    }

    /// Whether a FATAL dispatch terminates the process (default `true`)
    #[must_use = "builder methods return a new value"]
    pub fn exit_on_fatal(mut self, exit: bool) -> Self {
        self.exit_on_fatal = exit;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let stack_trace = if self.suppress_stack_traces {
            None
        } else {
            self.stack_trace
                .unwrap_or(Some(self.environment.default_stack_trace_level()))
        };

        Logger {
            level: AtomicLevel::new(
                self.min_level
                    .unwrap_or_else(|| self.environment.default_level()),
            ),
            environment: self.environment,
            stack_trace: RwLock::new(stack_trace),
            stack_traces_suppressed: self.suppress_stack_traces,
            appenders: RwLock::new(self.appenders),
            global_tags: self
                .global_tags
                .unwrap_or_else(|| GlobalTags::for_process().clone()),
            metrics: LoggerMetrics::new(),
            exit_on_fatal: self.exit_on_fatal,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
