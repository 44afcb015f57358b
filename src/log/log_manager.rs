use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::log::{level_threshold::ThresholdRegistry, log_sink::LogSink, logger::Logger};

/// Hands out per-component [`Logger`]s that share one sink and one registry.
#[derive(Clone)]
pub struct LogManager {
    registry: Arc<ThresholdRegistry>,
    sink: Arc<dyn LogSink>,
    faults: Arc<AtomicU64>,
}

impl LogManager {
    #[must_use]
    pub fn new(registry: Arc<ThresholdRegistry>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            registry,
            sink,
            faults: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Logger for `component`, bound to that component's threshold cell.
    #[must_use]
    pub fn logger(&self, component: &str) -> Logger {
        Logger::with_parts(
            component.into(),
            self.registry.threshold(component),
            Arc::clone(&self.sink),
            Arc::clone(&self.faults),
        )
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ThresholdRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    pub(crate) fn faults(&self) -> &Arc<AtomicU64> {
        &self.faults
    }

    /// Sink panics absorbed across every logger from this manager.
    #[must_use]
    pub fn sink_faults(&self) -> u64 {
        self.faults.load(Ordering::Relaxed)
    }
}
