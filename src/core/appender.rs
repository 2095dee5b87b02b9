//! Sink trait: the destination that writes dispatched entries

use super::{error::Result, log_entry::LogEntry};

/// A log destination.
///
/// The logger calls `append` once per emitted entry and then `flush` before
/// the dispatch returns, so an appender may buffer between the two calls but
/// must have written everything once `flush` succeeds.
pub trait Appender: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
