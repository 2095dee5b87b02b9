//! Log record: well-known request attributes plus caller-supplied fields
//!
//! A record is built per log call, handed to the logger and dropped after
//! dispatch. Serialization is deterministic: attributes are written in a
//! fixed order, extra fields in ascending key order, then global tags.
//! An attribute holding its zero value (empty string, unset time, zero
//! number) is never written.

use super::field_set::{sanitize, FieldSet, FieldValue};
use super::global_tags::GlobalTags;
use super::timestamp::format_timestamp;
use chrono::{DateTime, Utc};

pub const LOGGER_CONTEXT_KEY: &str = "rosetta-context";
pub const CORRELATION_ID_KEY: &str = "correlation-id";
pub const STATUS_KEY: &str = "status";
pub const METHOD_KEY: &str = "method";
pub const PROTOCOL_KEY: &str = "protocol";
pub const PATH_KEY: &str = "path";
pub const QUERY_KEY: &str = "query";
pub const CLIENT_IP_KEY: &str = "client-ip";
pub const USER_AGENT_KEY: &str = "user-agent";
pub const START_TIME_KEY: &str = "start-time";
pub const END_TIME_KEY: &str = "end-time";
pub const LATENCY_UNIT_KEY: &str = "latency-unit";
pub const LATENCY_KEY: &str = "latency";

/// Unit written next to `latency`
pub const LATENCY_UNIT: &str = "ns";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogRecord {
    pub client_address: String,
    pub correlation_id: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub latency_nanos: i64,
    pub logger_context: String,
    pub method: String,
    pub path: String,
    pub protocol: String,
    pub query: String,
    pub status_code: u16,
    pub user_agent: String,
    pub message: String,
    pub fields: FieldSet,
}

impl LogRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// A record carrying only a message
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.set(key, value);
        self
    }

    /// Set start and end time, deriving the latency from them
    #[must_use]
    pub fn with_timing(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        let elapsed = end - start;
        let saturated = if elapsed < chrono::Duration::zero() {
            i64::MIN
        } else {
            i64::MAX
        };
        self.latency_nanos = elapsed.num_nanoseconds().unwrap_or(saturated);
        self
    }

    /// Non-zero attributes in output order
    fn attributes(&self) -> Vec<(&'static str, FieldValue)> {
        let mut out = Vec::with_capacity(14);

        push_text(&mut out, LOGGER_CONTEXT_KEY, &self.logger_context);
        push_text(&mut out, CORRELATION_ID_KEY, &self.correlation_id);
        if self.status_code != 0 {
            out.push((STATUS_KEY, FieldValue::from(self.status_code)));
        }
        push_text(&mut out, METHOD_KEY, &self.method);
        push_text(&mut out, PROTOCOL_KEY, &self.protocol);
        push_text(&mut out, PATH_KEY, &self.path);
        push_text(&mut out, QUERY_KEY, &self.query);
        push_text(&mut out, CLIENT_IP_KEY, &self.client_address);
        push_text(&mut out, USER_AGENT_KEY, &self.user_agent);
        if let Some(start) = &self.start_time {
            out.push((START_TIME_KEY, FieldValue::String(format_timestamp(start))));
        }
        if let Some(end) = &self.end_time {
            out.push((END_TIME_KEY, FieldValue::String(format_timestamp(end))));
        }
        if self.latency_nanos != 0 {
            out.push((LATENCY_UNIT_KEY, FieldValue::from(LATENCY_UNIT)));
            out.push((LATENCY_KEY, FieldValue::Int(self.latency_nanos)));
        }

        out
    }

    /// Render the record's fields as space separated `key=value` pairs,
    /// followed by `global_tags` when given.
    ///
    /// The runtime passes its own tags through
    /// [`Logger::serialize_fields`](crate::Logger::serialize_fields).
    ///
    /// # Example
    ///
    /// ```
    /// use rosetta_logger::{GlobalTags, LogRecord};
    ///
    /// let mut record = LogRecord::with_message("done").with_field("user", "a1");
    /// record.status_code = 200;
    /// record.method = "GET".to_string();
    /// assert_eq!(record.serialize_fields(None), r#"status=200 method="GET" user="a1""#);
    ///
    /// let tags = GlobalTags::new("astra", "usersapi");
    /// assert!(record.serialize_fields(Some(&tags)).ends_with(r#"component="usersapi""#));
    /// ```
    pub fn serialize_fields(&self, global_tags: Option<&GlobalTags>) -> String {
        let mut parts: Vec<String> = self
            .attributes()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, value.to_plain()))
            .collect();

        parts.extend(
            self.fields
                .serialize()
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, value)),
        );

        if let Some(tags) = global_tags {
            parts.extend(
                tags.iter()
                    .map(|(key, value)| format!("{}=\"{}\"", key, sanitize(value))),
            );
        }

        parts.join(" ")
    }

    /// Typed fields in the same order as [`serialize_fields`](Self::serialize_fields)
    pub fn to_structured_fields(
        &self,
        global_tags: Option<&GlobalTags>,
    ) -> Vec<(String, FieldValue)> {
        let mut fields: Vec<(String, FieldValue)> = self
            .attributes()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();

        fields.extend(
            self.fields
                .sorted()
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.clone())),
        );

        if let Some(tags) = global_tags {
            fields.extend(
                tags.iter()
                    .map(|(key, value)| (key.to_string(), FieldValue::from(value))),
            );
        }

        fields
    }
}

fn push_text(out: &mut Vec<(&'static str, FieldValue)>, key: &'static str, value: &str) {
    if !value.is_empty() {
        out.push((key, FieldValue::from(value)));
    }
}
