use std::fmt;

/// A log argument computed only when the record is actually rendered.
///
/// The logging macros never evaluate their arguments for a disabled level, so
/// they do not need this. The method API does: it receives already-built
/// `&dyn Display` values, and the level check can then only save the
/// rendering, not whatever it cost to produce the value. Wrapping the
/// producer in `Lazy` moves that cost behind the check as well.
///
/// ```rust
/// use paramlog::log::{lazy, LogLevel, Logger, LevelThreshold, MemorySink};
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let logger = Logger::new("stats", Arc::new(LevelThreshold::new(LogLevel::Info)), sink.clone());
///
/// // Debug is below threshold: the closure never runs.
/// logger.debug("histogram: {}", &[&lazy(|| -> String { unreachable!() })]);
/// assert!(sink.is_empty());
/// ```
#[derive(Clone, Copy)]
pub struct Lazy<F>(F);

/// Wraps a zero-argument producer as a deferred log argument.
pub fn lazy<F, T>(producer: F) -> Lazy<F>
where
    F: Fn() -> T,
    T: fmt::Display,
{
    Lazy(producer)
}

impl<F, T> fmt::Display for Lazy<F>
where
    F: Fn() -> T,
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.0)().fmt(f)
    }
}

impl<F> fmt::Debug for Lazy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Lazy(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn producer_runs_once_per_render() {
        let calls = Cell::new(0);
        let arg = lazy(|| {
            calls.set(calls.get() + 1);
            "computed"
        });
        assert_eq!(calls.get(), 0);
        assert_eq!(arg.to_string(), "computed");
        assert_eq!(calls.get(), 1);
    }
}
