//! Fluent accumulation of record fields before emission
//!
//! A `RecordBuilder` collects fields and is consumed by exactly one
//! terminal severity call, which turns the fields into a `LogRecord` and
//! dispatches it. Reusing a field context across several emissions is
//! done by keeping a `FieldSet` and passing it to `with_fields`.

use super::field_set::{FieldSet, FieldValue};
use super::log_level::LogLevel;
use super::log_record::LogRecord;
use super::logger::Logger;
use std::fmt;

/// Key under which `with_error` stores the error message
pub const ERROR_FIELD_KEY: &str = "error";

/// Builder for a single log record
///
/// # Example
///
/// ```
/// use rosetta_logger::prelude::*;
///
/// let memory = MemoryAppender::new();
/// let logger = Logger::builder()
///     .global_tags(GlobalTags::empty())
///     .appender(memory.clone())
///     .build();
///
/// let failure: Option<&std::io::Error> = None;
/// logger
///     .with_field("user_id", 12345)
///     .with_field("latency_ms", 42.5)
///     .with_error(failure)
///     .info("Request processed");
///
/// let entry = &memory.entries()[0];
/// assert_eq!(entry.field("user_id"), Some(&FieldValue::Int(12345)));
/// assert!(entry.field("error").is_none());
/// ```
#[must_use = "a record builder does nothing until a severity method is called"]
pub struct RecordBuilder<'a> {
    logger: &'a Logger,
    fields: FieldSet,
}

impl<'a> RecordBuilder<'a> {
    /// Create a new builder with no fields
    pub fn new(logger: &'a Logger) -> Self {
        Self {
            logger,
            fields: FieldSet::new(),
        }
    }

    /// Add a field; a later value for the same key replaces the earlier one
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.set(key, value);
        self
    }

    /// Add every field of `fields`, overriding existing keys
    pub fn with_fields(mut self, fields: &FieldSet) -> Self {
        self.fields.extend_from(fields);
        self
    }

    /// Record `err`'s message under the `error` key; `None` leaves the builder unchanged
    pub fn with_error<E>(mut self, err: Option<&E>) -> Self
    where
        E: fmt::Display + ?Sized,
    {
        if let Some(err) = err {
            self.fields.set(ERROR_FIELD_KEY, err.to_string());
        }
        self
    }

    /// Fields accumulated so far
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Turn the accumulated fields into a record without dispatching it
    pub fn into_record(self, message: impl Into<String>) -> LogRecord {
        LogRecord {
            message: message.into(),
            fields: self.fields,
            ..LogRecord::default()
        }
    }

    /// Build the record and dispatch it at `level`
    pub fn log(self, level: LogLevel, message: impl Into<String>) {
        let logger = self.logger;
        if !logger.enabled(level) {
            logger.metrics().record_filtered();
            return;
        }
        let record = self.into_record(message);
        logger.log_message(level, Some(&record));
    }

    pub fn debug(self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Dispatch at FATAL.
    ///
    /// After the record is written and flushed the process exits, unless the
    /// logger was built with `exit_on_fatal(false)`.
    pub fn fatal(self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }
}

impl Logger {
    /// Start a record with one field
    pub fn with_field<K, V>(&self, key: K, value: V) -> RecordBuilder<'_>
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        RecordBuilder::new(self).with_field(key, value)
    }

    /// Start a record seeded with a copy of `fields`
    pub fn with_fields(&self, fields: &FieldSet) -> RecordBuilder<'_> {
        RecordBuilder::new(self).with_fields(fields)
    }

    /// Start a record carrying `err`'s message, if any
    pub fn with_error<E>(&self, err: Option<&E>) -> RecordBuilder<'_>
    where
        E: fmt::Display + ?Sized,
    {
        RecordBuilder::new(self).with_error(err)
    }
}
