//! # Rosetta Logger
//!
//! A structured logging facade. Request metadata and caller fields are
//! composed into a [`LogRecord`], serialized deterministically and written
//! through severity-filtered appenders.
//!
//! ## Features
//!
//! - **Deterministic output**: fixed attribute order, sorted extra fields
//! - **Two modes**: colored plain text for development, JSON for production
//! - **Dynamic threshold**: change the level at runtime from any thread
//! - **Environment driven**: `LOGGER_ENVIRONMENT`, `LOG_LEVEL`, `LOG_OUTPUT_FILE`
//!
//! ## Example
//!
//! ```
//! use rosetta_logger::prelude::*;
//!
//! let memory = MemoryAppender::new();
//! let logger = Logger::builder()
//!     .environment(Environment::Development)
//!     .appender(memory.clone())
//!     .build();
//!
//! logger.with_field("user", "a1").with_field("count", 3).info("done");
//! assert_eq!(memory.messages(), vec![r#"done count=3 user="a1""#]);
//! ```

pub mod appenders;
pub mod core;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender, MemoryAppender};
    pub use crate::core::{
        Appender, Environment, FieldSet, FieldValue, GlobalTags, LogEntry, LogLevel, LogRecord,
        Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, OutputFormat,
        RecordBuilder, Result,
    };
}

pub use appenders::{ConsoleAppender, FileAppender, MemoryAppender};
pub use core::{
    Appender, AtomicLevel, Environment, FieldSet, FieldValue, GlobalTags, LogEntry, LogLevel,
    LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, OpaqueValue,
    OutputFormat, RecordBuilder, Result, ERROR_FIELD_KEY, NIL_LOG_MESSAGE,
};
pub use global::{
    add_stack_trace, debug, debug_message, error, error_message, fatal, fatal_message, get_level,
    info, info_message, init, init_from_config, logger, set_level, warn, warn_message,
    with_error, with_field, with_fields,
};
