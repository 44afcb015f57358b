use crate::log::{log_record::LogRecord, log_sink::LogSink};

/// Discards every record.
#[derive(Debug, Clone, Default)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    #[inline]
    fn log(&self, _record: LogRecord) {}
}
