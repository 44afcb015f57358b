use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
    mpsc,
};

use thiserror::Error;

use crate::log::{log_record::LogRecord, log_sink::LogSink};

/// What travels over the queue to the worker.
pub(super) enum QueueMsg {
    Record(LogRecord),
    Flush(mpsc::Sender<()>),
    Shutdown,
}

/// Why a record could not be enqueued. The record itself is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnqueueError {
    #[error("log queue is full")]
    Full,
    #[error("log queue worker has stopped")]
    Closed,
}

/// Counters shared by every handle and the worker.
///
/// `accepted` and `taken` only matter once the worker has closed the queue:
/// records accepted but never taken went down with the channel and count as
/// dropped.
#[derive(Debug, Default)]
pub(super) struct QueueStats {
    pub(super) rejected: AtomicU64,
    pub(super) accepted: AtomicU64,
    pub(super) taken: AtomicU64,
    pub(super) closed: AtomicBool,
}

impl QueueStats {
    pub(super) fn dropped(&self) -> u64 {
        let mut total = self.rejected.load(Ordering::Acquire);
        if self.closed.load(Ordering::Acquire) {
            let accepted = self.accepted.load(Ordering::Acquire);
            total += accepted.saturating_sub(self.taken.load(Ordering::Acquire));
        }
        total
    }
}

/// Lightweight, cloneable handle to a [`QueuedSink`](super::QueuedSink).
///
/// `QueueHandle` is a thin, lock-free sink that enqueues records into a
/// bounded `SyncSender`. Calls to [`try_log`](Self::try_log) are non-blocking:
/// if the queue is full, the record is dropped, the shared drop counter is
/// bumped and an error is returned.
///
/// # Examples
/// ```ignore
/// // Usually you obtain it via: let handle = queued.handle();
/// let logger = Logger::new("jobs", threshold, Arc::new(handle));
/// ```
#[derive(Clone)]
pub struct QueueHandle {
    pub(super) tx: mpsc::SyncSender<QueueMsg>,
    pub(super) stats: Arc<QueueStats>,
}

impl LogSink for QueueHandle {
    #[inline]
    fn log(&self, record: LogRecord) {
        let _ = self.try_log(record);
    }
}

impl QueueHandle {
    /// Attempts to enqueue a record without blocking.
    ///
    /// # Errors
    /// Returns:
    /// - `Err(EnqueueError::Full)` when the bounded queue is at capacity.
    /// - `Err(EnqueueError::Closed)` when the worker has stopped.
    ///
    /// In both cases the record is counted as dropped.
    pub fn try_log(&self, record: LogRecord) -> Result<(), EnqueueError> {
        // Counted before the send so `accepted` never trails `taken`.
        self.stats.accepted.fetch_add(1, Ordering::AcqRel);
        self.tx.try_send(QueueMsg::Record(record)).map_err(|err| {
            self.stats.accepted.fetch_sub(1, Ordering::AcqRel);
            self.stats.rejected.fetch_add(1, Ordering::AcqRel);
            match err {
                mpsc::TrySendError::Full(_) => EnqueueError::Full,
                mpsc::TrySendError::Disconnected(_) => EnqueueError::Closed,
            }
        })
    }

    /// Records dropped so far because the queue was full or closed.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.stats.dropped()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::log::log_level::LogLevel;
    use std::sync::mpsc::sync_channel;

    fn rec(text: &str) -> LogRecord {
        LogRecord::new(
            LogLevel::Info,
            "{}",
            vec![text.into()],
            text.into(),
            "test::target".into(),
        )
    }

    fn handle(cap: usize) -> (QueueHandle, mpsc::Receiver<QueueMsg>) {
        let (tx, rx) = sync_channel::<QueueMsg>(cap);
        (
            QueueHandle {
                tx,
                stats: Arc::new(QueueStats::default()),
            },
            rx,
        )
    }

    #[test]
    fn try_log_ok_when_capacity_available() {
        let (h, rx) = handle(2);

        assert!(h.try_log(rec("hello")).is_ok(), "expected Ok from try_log");

        match rx.recv().expect("a message should arrive") {
            QueueMsg::Record(r) => {
                assert_eq!(r.level, LogLevel::Info);
                assert_eq!(r.message, "hello");
                assert_eq!(&*r.component, "test::target");
            }
            _ => panic!("expected a record"),
        }
        assert_eq!(h.dropped(), 0);
    }

    #[test]
    fn try_log_err_full_when_queue_full() {
        // Capacity = 1, send once and do not recv -> next send should be Full.
        let (h, _rx) = handle(1);

        h.try_log(rec("first")).expect("first send should succeed");

        assert_eq!(h.try_log(rec("second")), Err(EnqueueError::Full));
        assert_eq!(h.dropped(), 1);
        assert_eq!(h.stats.accepted.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn try_log_err_disconnected_when_receiver_closed() {
        let (h, rx) = handle(1);
        drop(rx);

        assert_eq!(h.try_log(rec("won't send")), Err(EnqueueError::Closed));
        // The LogSink path swallows the error but still counts it.
        h.log(rec("also dropped"));
        assert_eq!(h.dropped(), 2);
    }

    #[test]
    fn accepted_but_untaken_records_count_once_closed() {
        let (h, rx) = handle(4);
        h.try_log(rec("a")).unwrap();
        h.try_log(rec("b")).unwrap();

        assert!(matches!(rx.recv().unwrap(), QueueMsg::Record(_)));
        h.stats.taken.fetch_add(1, Ordering::AcqRel);
        assert_eq!(h.dropped(), 0);

        h.stats.closed.store(true, Ordering::Release);
        drop(rx);
        assert_eq!(h.dropped(), 1);
    }
}
