//! Routes records from the `log` crate facade into this crate's sinks.
//!
//! Libraries that log through `log::info!` and friends end up in the same
//! sink as native loggers, filtered by the same per-component thresholds. The
//! `log` target is used as the component name.

use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use log::{LevelFilter, Log, Metadata, Record};

use crate::log::{
    level_threshold::ThresholdRegistry, log_level::LogLevel, log_manager::LogManager,
    log_record::LogRecord, log_sink::LogSink, template,
};

pub struct LogBridge {
    registry: Arc<ThresholdRegistry>,
    sink: Arc<dyn LogSink>,
    faults: Arc<AtomicU64>,
}

impl LogBridge {
    #[must_use]
    pub fn new(manager: &LogManager) -> Self {
        Self {
            registry: Arc::clone(manager.registry()),
            sink: Arc::clone(manager.sink()),
            faults: Arc::clone(manager.faults()),
        }
    }

    /// Installs the bridge as the global `log` logger.
    ///
    /// `log`'s own max level is opened up to `Trace` so the per-component
    /// thresholds make the decision. Returns an error if a logger is already set.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(LevelFilter::Trace);
        Ok(())
    }
}

impl Log for LogBridge {
    // Targets are not registered here; only loggers and admin calls add cells.
    fn enabled(&self, metadata: &Metadata) -> bool {
        LogLevel::from(metadata.level()) >= self.registry.level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // A `log` call without arguments keeps its literal as the template
        // unless it holds braces; anything else arrives pre-formatted and
        // becomes the single argument.
        let (template, args, message) = match record.args().as_str() {
            Some(literal) if template::is_well_formed(literal) => {
                (literal, Vec::new(), literal.to_string())
            }
            _ => {
                let rendered = record.args().to_string();
                ("{}", vec![rendered.clone()], rendered)
            }
        };

        let out = LogRecord::new(
            LogLevel::from(record.level()),
            template,
            args,
            message,
            record.target().into(),
        );
        if panic::catch_unwind(AssertUnwindSafe(|| self.sink.log(out))).is_err() {
            self.faults.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn flush(&self) {
        if panic::catch_unwind(AssertUnwindSafe(|| self.sink.flush())).is_err() {
            self.faults.fetch_add(1, Ordering::Relaxed);
        }
    }
}
