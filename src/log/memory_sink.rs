use std::sync::{Mutex, MutexGuard};

use crate::log::{log_level::LogLevel, log_record::LogRecord, log_sink::LogSink};

/// Keeps every record in memory.
///
/// Meant for tests and for embedding code that wants to inspect what was
/// logged. Accepting a record takes a short mutex; it never does I/O.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copies of the captured records, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    /// Rendered messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|r| r.message.clone()).collect()
    }

    #[must_use]
    pub fn count_at(&self, level: LogLevel) -> usize {
        self.lock().iter().filter(|r| r.level == level).count()
    }

    /// Removes and returns everything captured so far.
    pub fn take(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.lock())
    }
}

impl LogSink for MemorySink {
    fn log(&self, record: LogRecord) {
        self.lock().push(record);
    }
}
