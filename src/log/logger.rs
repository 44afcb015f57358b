use std::{
    fmt::Display,
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::log::{
    level_threshold::LevelThreshold,
    log_level::LogLevel,
    log_record::LogRecord,
    log_sink::LogSink,
    logged_error::{IntoLoggedError, LoggedError},
    template,
};

/// Level-gated, parameterized logger for one component.
///
/// Every call first compares its level with the component's
/// [`LevelThreshold`]. A disabled call returns right there: nothing is
/// rendered, no record is built and the sink is not touched. An enabled call
/// substitutes the arguments into the template, attaches the trailing error
/// as a [`LoggedError`], and hands the [`LogRecord`] to the sink.
///
/// Prefer the `logger_*!` macros: they check the template against the
/// argument count at compile time and do not evaluate the arguments at all
/// for a disabled level. The methods take pre-built values (see
/// [`Lazy`](crate::log::Lazy) for deferring their computation) and panic on a
/// template/argument mismatch.
///
/// Cloning is cheap; clones share the threshold cell, the sink and the fault
/// counter.
#[derive(Clone)]
pub struct Logger {
    component: Arc<str>,
    threshold: Arc<LevelThreshold>,
    sink: Arc<dyn LogSink>,
    faults: Arc<AtomicU64>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("component", &self.component)
            .field("threshold", &self.threshold.get())
            .finish_non_exhaustive()
    }
}

impl Logger {
    #[must_use]
    pub fn new(
        component: impl Into<Arc<str>>,
        threshold: Arc<LevelThreshold>,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self::with_parts(
            component.into(),
            threshold,
            sink,
            Arc::new(AtomicU64::new(0)),
        )
    }

    pub(crate) fn with_parts(
        component: Arc<str>,
        threshold: Arc<LevelThreshold>,
        sink: Arc<dyn LogSink>,
        faults: Arc<AtomicU64>,
    ) -> Self {
        Self {
            component,
            threshold,
            sink,
            faults,
        }
    }

    /// A logger named `<this>::<child>` sharing this logger's threshold and sink.
    #[must_use]
    pub fn with_component(&self, child: &str) -> Self {
        Self {
            component: format!("{}::{child}", self.component).into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    #[must_use]
    pub fn threshold(&self) -> &Arc<LevelThreshold> {
        &self.threshold
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.threshold.is_enabled(level)
    }

    /// Panics raised by the sink while accepting a record. Such records are lost.
    #[must_use]
    pub fn sink_faults(&self) -> u64 {
        self.faults.load(Ordering::Relaxed)
    }

    /// Logs `template` at `level` with positional `args`.
    ///
    /// # Panics
    /// If the template is malformed or the number of `{}` differs from
    /// `args.len()`, and only when `level` is enabled.
    #[inline]
    pub fn log(&self, level: LogLevel, template: &'static str, args: &[&dyn Display]) {
        if !self.is_enabled(level) {
            return;
        }
        self.emit(level, template, stringify_args(args), None);
    }

    /// Like [`log`](Self::log), with `error` attached as structured data.
    ///
    /// # Panics
    /// Same as [`log`](Self::log).
    #[inline]
    pub fn log_with<E: IntoLoggedError>(
        &self,
        level: LogLevel,
        template: &'static str,
        args: &[&dyn Display],
        error: E,
    ) {
        if !self.is_enabled(level) {
            return;
        }
        self.emit(
            level,
            template,
            stringify_args(args),
            Some(error.into_logged_error()),
        );
    }

    pub fn error(&self, template: &'static str, args: &[&dyn Display]) {
        self.log(LogLevel::Error, template, args);
    }

    pub fn warn(&self, template: &'static str, args: &[&dyn Display]) {
        self.log(LogLevel::Warn, template, args);
    }

    pub fn info(&self, template: &'static str, args: &[&dyn Display]) {
        self.log(LogLevel::Info, template, args);
    }

    pub fn debug(&self, template: &'static str, args: &[&dyn Display]) {
        self.log(LogLevel::Debug, template, args);
    }

    pub fn error_with<E: IntoLoggedError>(
        &self,
        template: &'static str,
        args: &[&dyn Display],
        error: E,
    ) {
        self.log_with(LogLevel::Error, template, args, error);
    }

    pub fn warn_with<E: IntoLoggedError>(
        &self,
        template: &'static str,
        args: &[&dyn Display],
        error: E,
    ) {
        self.log_with(LogLevel::Warn, template, args, error);
    }

    pub fn info_with<E: IntoLoggedError>(
        &self,
        template: &'static str,
        args: &[&dyn Display],
        error: E,
    ) {
        self.log_with(LogLevel::Info, template, args, error);
    }

    pub fn debug_with<E: IntoLoggedError>(
        &self,
        template: &'static str,
        args: &[&dyn Display],
        error: E,
    ) {
        self.log_with(LogLevel::Debug, template, args, error);
    }

    /// Builds and delivers a record whose level check already passed.
    ///
    /// Used by the logging macros; call [`log`](Self::log) instead.
    ///
    /// # Panics
    /// On a template/argument mismatch.
    #[doc(hidden)]
    pub fn emit(
        &self,
        level: LogLevel,
        template: &'static str,
        args: Vec<String>,
        error: Option<LoggedError>,
    ) {
        if let Err(err) = template::validate(template, args.len()) {
            panic!("{err}");
        }
        let message = template::render_unchecked(template, &args);
        let record = LogRecord::new(level, template, args, message, Arc::clone(&self.component))
            .with_error(error);

        if panic::catch_unwind(AssertUnwindSafe(|| self.sink.log(record))).is_err() {
            self.faults.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Flushes the underlying sink.
    pub fn flush(&self) {
        let _ = panic::catch_unwind(AssertUnwindSafe(|| self.sink.flush()));
    }
}

fn stringify_args(args: &[&dyn Display]) -> Vec<String> {
    args.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::log::{lazy_arg::lazy, memory_sink::MemorySink};
    use std::cell::Cell;

    fn setup(level: LogLevel) -> (Logger, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::new(
            "orders",
            Arc::new(LevelThreshold::new(level)),
            sink.clone(),
        );
        (logger, sink)
    }

    #[derive(Debug)]
    struct Refused;

    impl std::fmt::Display for Refused {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("payment refused by issuer")
        }
    }

    impl std::error::Error for Refused {}

    struct ExplodingSink;

    impl LogSink for ExplodingSink {
        fn log(&self, _record: LogRecord) {
            panic!("sink is down");
        }
    }

    #[test]
    fn renders_enabled_call() {
        let (logger, sink) = setup(LogLevel::Debug);
        logger.debug("Method called with arg {}", &[&42]);

        let recs = sink.records();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].message, "Method called with arg 42");
        assert_eq!(recs[0].template, "Method called with arg {}");
        assert_eq!(recs[0].args, vec!["42"]);
        assert_eq!(&*recs[0].component, "orders");
        assert!(recs[0].error.is_none());
    }

    #[test]
    fn disabled_call_skips_sink_and_lazy_args() {
        let (logger, sink) = setup(LogLevel::Error);
        let calls = Cell::new(0);
        let expensive = lazy(|| {
            calls.set(calls.get() + 1);
            "big"
        });

        logger.debug("dump {}", &[&expensive]);
        logger.info("dump {}", &[&expensive]);
        logger.warn("dump {}", &[&expensive]);

        assert!(sink.is_empty());
        assert_eq!(calls.get(), 0);

        logger.error("dump {}", &[&expensive]);
        assert_eq!(calls.get(), 1);
        assert_eq!(sink.messages(), vec!["dump big"]);
    }

    #[test]
    fn error_is_a_separate_field() {
        let (logger, sink) = setup(LogLevel::Info);
        logger.error_with("charge for order {} failed", &[&7], &Refused);

        let rec = &sink.records()[0];
        assert_eq!(rec.message, "charge for order 7 failed");
        assert!(!rec.message.contains("refused"));
        let err = rec.error.as_ref().unwrap();
        assert_eq!(err.message, "payment refused by issuer");
    }

    #[test]
    #[should_panic(expected = "1 placeholder(s) but 2 argument(s)")]
    fn surplus_arguments_panic() {
        let (logger, _sink) = setup(LogLevel::Debug);
        logger.info("only {}", &[&1, &2]);
    }

    #[test]
    #[should_panic(expected = "2 placeholder(s) but 1 argument(s)")]
    fn missing_arguments_panic() {
        let (logger, _sink) = setup(LogLevel::Debug);
        logger.info("{} and {}", &[&1]);
    }

    #[test]
    fn mismatch_on_disabled_level_is_not_checked() {
        let (logger, sink) = setup(LogLevel::Error);
        logger.debug("{} and {}", &[&1]);
        assert!(sink.is_empty());
    }

    #[test]
    fn sink_panics_are_absorbed_and_counted() {
        let logger = Logger::new(
            "fragile",
            Arc::new(LevelThreshold::new(LogLevel::Debug)),
            Arc::new(ExplodingSink),
        );
        logger.info("first", &[]);
        logger.error("second", &[]);
        assert_eq!(logger.sink_faults(), 2);
    }

    #[test]
    fn threshold_changes_apply_to_next_call() {
        let (logger, sink) = setup(LogLevel::Debug);
        logger.info("before", &[]);
        logger.threshold().set(LogLevel::Error);
        logger.info("after", &[]);
        logger.error("still on", &[]);
        assert_eq!(sink.messages(), vec!["before", "still on"]);
    }

    #[test]
    fn child_component_shares_threshold_and_sink() {
        let (logger, sink) = setup(LogLevel::Info);
        let child = logger.with_component("refunds");
        child.info("hello", &[]);
        logger.threshold().set(LogLevel::Error);
        child.info("muted", &[]);

        assert_eq!(child.component(), "orders::refunds");
        assert_eq!(sink.len(), 1);
        assert_eq!(&*sink.records()[0].component, "orders::refunds");
    }
}
