//! Output format configuration for log entries
//!
//! - Text: human-readable console line, used in development mode
//! - Json: one JSON object per line, used in production mode

use super::field_set::sanitize;
use super::log_entry::LogEntry;
use super::timestamp::format_timestamp;
use colored::Colorize;

pub const LEVEL_KEY: &str = "level";
pub const TIMESTAMP_KEY: &str = "timestamp";
pub const MESSAGE_KEY: &str = "msg";
pub const STACKTRACE_KEY: &str = "stacktrace";

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab separated text, fields as `key=value` pairs
    ///
    /// Example: `2025-01-08T10:30:45.000000Z	INFO	done user="a1"`
    #[default]
    Text,

    /// JSON object with fields in dispatch order
    ///
    /// Example: `{"level":"info","timestamp":"2025-01-08T10:30:45.000000Z","msg":"done","user":"a1"}`
    Json,
}

impl OutputFormat {
    /// Format a log entry according to this output format
    pub fn format(&self, entry: &LogEntry, use_colors: bool) -> String {
        match self {
            OutputFormat::Text => self.format_text(entry, use_colors),
            OutputFormat::Json => self.format_json(entry),
        }
    }

    fn format_text(&self, entry: &LogEntry, use_colors: bool) -> String {
        let level_str = if use_colors {
            entry
                .level
                .to_str()
                .color(entry.level.color_code())
                .to_string()
        } else {
            entry.level.to_str().to_string()
        };

        let mut output = format!(
            "{}\t{}\t{}",
            format_timestamp(&entry.timestamp),
            level_str,
            sanitize(&entry.message)
        );

        if !entry.fields.is_empty() {
            let fields = entry
                .fields
                .iter()
                .map(|(key, value)| format!("{}={}", key, value.to_plain()))
                .collect::<Vec<_>>()
                .join(" ");
            output.push('\t');
            output.push_str(&fields);
        }

        if let Some(ref stack_trace) = entry.stack_trace {
            output.push('\n');
            output.push_str(stack_trace.trim_end());
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            LEVEL_KEY.to_string(),
            serde_json::Value::String(entry.level.to_lowercase_str().to_string()),
        );
        json_obj.insert(
            TIMESTAMP_KEY.to_string(),
            serde_json::Value::String(format_timestamp(&entry.timestamp)),
        );
        json_obj.insert(
            MESSAGE_KEY.to_string(),
            serde_json::Value::String(entry.message.clone()),
        );

        for (key, value) in &entry.fields {
            json_obj.insert(key.clone(), value.to_json_value());
        }

        if let Some(ref stack_trace) = entry.stack_trace {
            json_obj.insert(
                STACKTRACE_KEY.to_string(),
                serde_json::Value::String(stack_trace.clone()),
            );
        }

        serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FieldValue, LogLevel};

    fn entry_with_fields() -> LogEntry {
        LogEntry::new(LogLevel::Info, "Request completed").with_fields(vec![
            ("status".to_string(), FieldValue::Int(200)),
            ("path".to_string(), FieldValue::from("/users")),
            ("application".to_string(), FieldValue::from("astra")),
        ])
    }

    #[test]
    fn test_text_format() {
        let entry = LogEntry::new(LogLevel::Info, "Test message");
        let result = OutputFormat::Text.format(&entry, false);

        let columns: Vec<&str> = result.split('\t').collect();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[1], "INFO");
        assert_eq!(columns[2], "Test message");
    }

    #[test]
    fn test_text_format_with_fields() {
        let result = OutputFormat::Text.format(&entry_with_fields(), false);
        assert!(result.ends_with("\tstatus=200 path=\"/users\" application=\"astra\""));
    }

    #[test]
    fn test_text_format_with_stack_trace() {
        let entry = LogEntry::new(LogLevel::Error, "boom").with_stack_trace("frame 0\n".to_string());
        let result = OutputFormat::Text.format(&entry, false);
        assert!(result.ends_with("boom\nframe 0"));
    }

    #[test]
    fn test_text_escapes_line_breaks_in_message() {
        let entry = LogEntry::new(LogLevel::Info, "User login\nERROR fake\tentry");
        let result = OutputFormat::Text.format(&entry, false);

        assert_eq!(result.lines().count(), 1);
        assert!(result.ends_with("\tUser login\\nERROR fake\\tentry"));
    }

    #[test]
    fn test_json_keeps_message_verbatim() {
        let entry = LogEntry::new(LogLevel::Info, "User login\nERROR fake");
        let result = OutputFormat::Json.format(&entry, false);

        assert_eq!(result.lines().count(), 1);
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["msg"], "User login\nERROR fake");
    }

    #[test]
    fn test_json_format() {
        let entry = LogEntry::new(LogLevel::Error, "Error occurred");
        let result = OutputFormat::Json.format(&entry, false);

        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["level"], "error");
        assert_eq!(parsed["msg"], "Error occurred");
        assert!(parsed["timestamp"].is_string());
        assert!(parsed.get("stacktrace").is_none());
    }

    #[test]
    fn test_json_keeps_field_order() {
        let result = OutputFormat::Json.format(&entry_with_fields(), false);

        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["status"], 200);
        assert!(parsed["timestamp"].is_string());

        let keys: Vec<&String> = parsed.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            vec!["level", "timestamp", "msg", "status", "path", "application"]
        );
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
