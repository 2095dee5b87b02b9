//! In-memory recording appender

use crate::core::{Appender, LogEntry, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Records every entry it receives.
///
/// Clones share the same buffer, so a clone kept by the caller observes
/// what the logger wrote through the boxed original.
#[derive(Debug, Clone, Default)]
pub struct MemoryAppender {
    entries: Arc<Mutex<Vec<LogEntry>>>,
    flushes: Arc<AtomicUsize>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded entries, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Messages of recorded entries, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of completed flush calls
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::Acquire)
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
