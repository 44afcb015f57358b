use std::sync::Arc;

use crate::log::log_record::LogRecord;

/// Destination for emitted records.
///
/// `log` must return promptly: implementations that do I/O hand the record
/// off (see [`QueuedSink`](crate::log::QueuedSink)) instead of blocking the
/// calling thread. A sink that cannot accept a record drops it; it never
/// reports failure back to the logging call.
pub trait LogSink: Send + Sync {
    fn log(&self, record: LogRecord);

    /// Delivers anything buffered. The default does nothing.
    fn flush(&self) {}
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    #[inline]
    fn log(&self, record: LogRecord) {
        (**self).log(record);
    }

    fn flush(&self) {
        (**self).flush();
    }
}
