//! Log entry structure handed to appenders

use super::field_set::FieldValue;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};

/// One emission as seen by an appender: a severity, a message and an ordered
/// list of typed fields. Plain-text mode folds the fields into the message
/// and leaves `fields` empty. The message is kept verbatim; escaping is up
/// to the line format.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub fields: Vec<(String, FieldValue)>,
    pub stack_trace: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl AsRef<str>) -> Self {
        Self {
            level,
            message: message.as_ref().to_string(),
            timestamp: Utc::now(),
            fields: Vec::new(),
            stack_trace: None,
        }
    }

    pub fn with_fields(mut self, fields: Vec<(String, FieldValue)>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_stack_trace(mut self, stack_trace: String) -> Self {
        self.stack_trace = Some(stack_trace);
        self
    }

    /// Look up the first field with the given key
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}
