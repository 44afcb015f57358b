use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
        mpsc::{self, TryRecvError},
    },
    thread,
};

use crate::log::{
    log_level::LogLevel,
    log_record::LogRecord,
    log_sink::LogSink,
    queue_handle::{QueueHandle, QueueMsg, QueueStats},
};

// -----------------------------------------------------------------------------
// COMPILE-TIME CONFIGURATION
// -----------------------------------------------------------------------------

/// Flush the downstream sink every 100 records when debug logging is compiled in.
#[cfg(feature = "log-debug")]
const FLUSH_BATCH_SIZE: u64 = 100;

/// Flush the downstream sink every 1000 records otherwise.
#[cfg(not(feature = "log-debug"))]
const FLUSH_BATCH_SIZE: u64 = 1_000;

/// Component name used for the queue's own diagnostics.
pub const INTERNAL_COMPONENT: &str = "paramlog";

// -----------------------------------------------------------------------------

/// Bounded, non-blocking front for a sink that may block.
///
/// Producers enqueue with `try_send`; a dedicated worker thread drains the
/// queue into the wrapped sink. When the queue is full the record is dropped
/// and counted, so a slow downstream never stalls a logging call.
///
/// # Architecture
///
/// 1. **Producers**: logging calls go through [`QueueHandle::try_log`].
/// 2. **Queue**: a bounded `mpsc::sync_channel` buffers records.
/// 3. **Consumer**: the worker forwards each record downstream and flushes it
///    every `FLUSH_BATCH_SIZE` records.
/// 4. **Drop report**: on every flush the worker emits one `Warn` record under
///    the `paramlog` component if records were dropped since the last report.
///
/// Dropping the `QueuedSink` delivers everything already enqueued and joins
/// the worker. Records that a surviving [`QueueHandle`] manages to enqueue
/// while the queue closes are counted as dropped.
pub struct QueuedSink {
    handle: QueueHandle,
    delivered: Arc<AtomicU64>,
    worker: Option<thread::JoinHandle<()>>,
}

impl QueuedSink {
    /// Spawns the worker and returns the sink.
    ///
    /// `capacity` is the number of records that may wait in the queue. If the
    /// worker thread cannot be spawned every record is counted as dropped.
    #[must_use]
    pub fn start<S: LogSink + 'static>(downstream: S, capacity: usize) -> Self {
        let (tx, rx) = mpsc::sync_channel::<QueueMsg>(capacity);
        let stats = Arc::new(QueueStats::default());
        let delivered = Arc::new(AtomicU64::new(0));

        let worker_stats = Arc::clone(&stats);
        let worker_delivered = Arc::clone(&delivered);

        let worker = thread::Builder::new()
            .name("paramlog-worker".into())
            .spawn(move || {
                run_worker(&downstream, rx, &worker_stats, &worker_delivered);
            })
            .ok();

        if worker.is_none() {
            stats.closed.store(true, Ordering::Release);
        }

        Self {
            handle: QueueHandle { tx, stats },
            delivered,
            worker,
        }
    }

    /// Returns a cloneable handle that enqueues into this sink.
    #[must_use]
    pub fn handle(&self) -> QueueHandle {
        self.handle.clone()
    }

    /// Records dropped because the queue was full or the worker was gone.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.handle.dropped()
    }

    /// Records the downstream sink accepted without panicking.
    #[must_use]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }
}

impl LogSink for QueuedSink {
    #[inline]
    fn log(&self, record: LogRecord) {
        self.handle.log(record);
    }

    /// Blocks until every record enqueued before this call reached downstream.
    fn flush(&self) {
        if self.worker.is_none() {
            return;
        }
        let (ack_tx, ack_rx) = mpsc::channel();
        if self.handle.tx.send(QueueMsg::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

impl Drop for QueuedSink {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.handle.tx.send(QueueMsg::Shutdown);
            let _ = worker.join();
        }
    }
}

fn run_worker<S: LogSink>(
    downstream: &S,
    rx: mpsc::Receiver<QueueMsg>,
    stats: &QueueStats,
    delivered: &AtomicU64,
) {
    let mut since_flush: u64 = 0;
    let mut reported_drops: u64 = 0;

    let deliver = |record: LogRecord, since_flush: &mut u64| {
        stats.taken.fetch_add(1, Ordering::AcqRel);
        // A panicking downstream loses this record, not the worker.
        if panic::catch_unwind(AssertUnwindSafe(|| downstream.log(record))).is_ok() {
            delivered.fetch_add(1, Ordering::Relaxed);
        }
        *since_flush += 1;
        if *since_flush >= FLUSH_BATCH_SIZE {
            let _ = panic::catch_unwind(AssertUnwindSafe(|| downstream.flush()));
            *since_flush = 0;
        }
    };

    while let Ok(msg) = rx.recv() {
        match msg {
            QueueMsg::Record(record) => deliver(record, &mut since_flush),
            QueueMsg::Flush(ack) => {
                report_drops(downstream, stats, &mut reported_drops);
                let _ = panic::catch_unwind(AssertUnwindSafe(|| downstream.flush()));
                since_flush = 0;
                let _ = ack.send(());
            }
            QueueMsg::Shutdown => break,
        }
    }

    // Handles may still have enqueued behind the shutdown marker.
    loop {
        match rx.try_recv() {
            Ok(QueueMsg::Record(record)) => deliver(record, &mut since_flush),
            Ok(QueueMsg::Flush(ack)) => {
                let _ = ack.send(());
            }
            Ok(QueueMsg::Shutdown) => {}
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
        }
    }
    stats.closed.store(true, Ordering::Release);
    drop(rx);

    report_drops(downstream, stats, &mut reported_drops);
    let _ = panic::catch_unwind(AssertUnwindSafe(|| downstream.flush()));
}

fn report_drops<S: LogSink>(downstream: &S, stats: &QueueStats, reported: &mut u64) {
    let total = stats.dropped();
    let fresh = total.saturating_sub(*reported);
    if fresh == 0 {
        return;
    }
    *reported = total;
    let record = LogRecord::new(
        LogLevel::Warn,
        "log queue dropped {} record(s) under backpressure",
        vec![fresh.to_string()],
        format!("log queue dropped {fresh} record(s) under backpressure"),
        INTERNAL_COMPONENT.into(),
    );
    let _ = panic::catch_unwind(AssertUnwindSafe(|| downstream.log(record)));
}
