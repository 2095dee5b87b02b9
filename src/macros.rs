//! Logging macros with `format!` style arguments.
//!
//! The first argument is any target with the matching severity method: a
//! [`Logger`](crate::Logger) reference or a [`RecordBuilder`](crate::RecordBuilder).
//!
//! # Examples
//!
//! ```
//! use rosetta_logger::prelude::*;
//! use rosetta_logger::info;
//!
//! let memory = MemoryAppender::new();
//! let logger = Logger::builder().appender(memory.clone()).build();
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! info!(logger.with_field("user", "a1"), "User {} logged in", 42);
//!
//! assert_eq!(memory.messages(), vec!["Server listening on port 8080", "User 42 logged in"]);
//! ```

/// Log a formatted message at the given level.
///
/// # Examples
///
/// ```
/// # use rosetta_logger::prelude::*;
/// # let logger = Logger::new();
/// use rosetta_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($target:expr, $level:expr, $($arg:tt)+) => {
        $target.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message, then terminate the process.
///
/// The process exits after the entry is flushed unless the logger was
/// built with `exit_on_fatal(false)`.
#[macro_export]
macro_rules! fatal {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::MemoryAppender;
    use crate::core::{LogLevel, Logger};

    fn test_logger() -> (Logger, MemoryAppender) {
        let memory = MemoryAppender::new();
        let logger = Logger::builder()
            .min_level(LogLevel::Debug)
            .stack_trace(None)
            .exit_on_fatal(false)
            .appender(memory.clone())
            .build();
        (logger, memory)
    }

    #[test]
    fn test_log_macro() {
        let (logger, memory) = test_logger();
        log!(logger, LogLevel::Info, "Test message");
        log!(logger, LogLevel::Info, "Formatted: {}", 42);
        assert_eq!(memory.messages(), vec!["Test message", "Formatted: 42"]);
    }

    #[test]
    fn test_level_macros() {
        let (logger, memory) = test_logger();
        debug!(logger, "Count: {}", 5);
        info!(logger, "Items: {}", 100);
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);
        fatal!(logger, "Critical failure: {}", "system");

        let levels: Vec<LogLevel> = memory.entries().iter().map(|e| e.level).collect();
        assert_eq!(levels, LogLevel::ALL.to_vec());
        assert_eq!(memory.messages()[2], "Retry 1 of 3");
    }

    #[test]
    fn test_macros_on_record_builder() {
        let (logger, memory) = test_logger();
        warn!(logger.with_field("attempt", 2), "retrying {}", "upload");

        let entry = &memory.entries()[0];
        assert_eq!(entry.message, "retrying upload");
        assert_eq!(entry.field("attempt"), Some(&crate::FieldValue::Int(2)));
    }
}
