//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod field_set;
pub mod global_tags;
pub mod log_entry;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod record_builder;
pub mod timestamp;

pub use appender::Appender;
pub use config::{Environment, LoggerConfig};
pub use error::{LoggerError, Result};
pub use field_set::{FieldSet, FieldValue, OpaqueValue};
pub use global_tags::GlobalTags;
pub use log_entry::LogEntry;
pub use log_level::{AtomicLevel, LogLevel};
pub use log_record::LogRecord;
pub use logger::{Logger, LoggerBuilder, NIL_LOG_MESSAGE};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use record_builder::{RecordBuilder, ERROR_FIELD_KEY};
pub use timestamp::format_timestamp;
