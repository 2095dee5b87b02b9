//! Process-wide default logger
//!
//! Call sites that do not carry a `Logger` handle use the functions in this
//! module. The default logger is created exactly once: either explicitly
//! through [`init`] / [`init_from_config`], or lazily from the process
//! environment on first use. Threads racing on first use block until the
//! single construction finishes and then share it.

use crate::core::{
    FieldSet, FieldValue, LogLevel, LogRecord, Logger, LoggerConfig, LoggerError, RecordBuilder,
    Result,
};
use std::fmt;
use std::sync::OnceLock;

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Install `logger` as the process default.
///
/// # Errors
///
/// Returns [`LoggerError::AlreadyInitialized`] if a default logger exists,
/// whether installed explicitly or created by an earlier call.
pub fn init(logger: Logger) -> Result<&'static Logger> {
    DEFAULT_LOGGER
        .set(logger)
        .map_err(|_| LoggerError::AlreadyInitialized)?;
    Ok(self::logger())
}

/// Build a logger from `config` and install it as the process default
pub fn init_from_config(config: &LoggerConfig) -> Result<&'static Logger> {
    init(Logger::from_config(config)?)
}

/// The process default logger, built from the environment on first use.
///
/// If the environment names an output file that cannot be opened the
/// process exits with status 1 rather than run without its log file.
pub fn logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(|| match Logger::from_config(&LoggerConfig::from_env()) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("[LOGGER ERROR] Failed to build logger from environment: {}", e);
            std::process::exit(1);
        }
    })
}

pub fn with_field<K, V>(key: K, value: V) -> RecordBuilder<'static>
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    logger().with_field(key, value)
}

pub fn with_fields(fields: &FieldSet) -> RecordBuilder<'static> {
    logger().with_fields(fields)
}

pub fn with_error<E>(err: Option<&E>) -> RecordBuilder<'static>
where
    E: fmt::Display + ?Sized,
{
    logger().with_error(err)
}

pub fn debug(message: impl Into<String>) {
    logger().debug(message);
}

pub fn info(message: impl Into<String>) {
    logger().info(message);
}

pub fn warn(message: impl Into<String>) {
    logger().warn(message);
}

pub fn error(message: impl Into<String>) {
    logger().error(message);
}

/// Log at FATAL on the default logger, then terminate the process
pub fn fatal(message: impl Into<String>) {
    logger().fatal(message);
}

pub fn debug_message(record: Option<&LogRecord>) {
    logger().log_message(LogLevel::Debug, record);
}

pub fn info_message(record: Option<&LogRecord>) {
    logger().log_message(LogLevel::Info, record);
}

pub fn warn_message(record: Option<&LogRecord>) {
    logger().log_message(LogLevel::Warn, record);
}

pub fn error_message(record: Option<&LogRecord>) {
    logger().log_message(LogLevel::Error, record);
}

/// Dispatch at FATAL on the default logger, then terminate the process
pub fn fatal_message(record: Option<&LogRecord>) {
    logger().log_message(LogLevel::Fatal, record);
}

/// Change the default logger's threshold by name
pub fn set_level(name: &str) -> Result<()> {
    logger().set_level(name)
}

pub fn get_level() -> LogLevel {
    logger().get_level()
}

pub fn add_stack_trace(name: &str) {
    logger().add_stack_trace(name);
}
