use std::{backtrace::BacktraceStatus, error::Error, fmt};

use serde::Serialize;

/// An error attached to a log record as data.
///
/// The cause chain is kept as a linked list of `LoggedError`s rather than a
/// flattened string, so sinks can walk it or serialize it as nested objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedError {
    /// `Display` output of this error alone, without its causes.
    pub message: String,
    /// `Debug` output of this error, which usually carries the variant name.
    pub detail: String,
    /// Captured backtrace, when the error carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caused_by: Option<Box<LoggedError>>,
}

impl LoggedError {
    /// Captures `err` and every `source()` below it.
    #[must_use]
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let caused_by = err.source().map(|src| Box::new(Self::from_error(src)));
        Self {
            message: err.to_string(),
            detail: format!("{err:?}"),
            trace: None,
            caused_by,
        }
    }

    /// Captures an `anyhow::Error`, including its backtrace when one was recorded.
    #[must_use]
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let mut chain = err.chain();
        let Some(head) = chain.next() else {
            return Self::message(err.to_string());
        };
        let mut logged = Self {
            message: head.to_string(),
            detail: format!("{head:?}"),
            trace: None,
            caused_by: head.source().map(|src| Box::new(Self::from_error(src))),
        };
        let bt = err.backtrace();
        if bt.status() == BacktraceStatus::Captured {
            logged.trace = Some(bt.to_string());
        }
        logged
    }

    /// A bare message with no cause, for errors that only exist as text.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            detail: message.clone(),
            message,
            trace: None,
            caused_by: None,
        }
    }

    #[must_use]
    pub fn with_cause(mut self, cause: LoggedError) -> Self {
        self.caused_by = Some(Box::new(cause));
        self
    }

    /// This error followed by each cause, outermost first.
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    #[must_use]
    pub fn root_cause(&self) -> &LoggedError {
        self.chain().last().unwrap_or(self)
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.chain().count()
    }
}

impl fmt::Display for LoggedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if f.alternate() {
            for cause in self.chain().skip(1) {
                write!(f, ": {}", cause.message)?;
            }
        }
        Ok(())
    }
}

pub struct Chain<'a> {
    next: Option<&'a LoggedError>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a LoggedError;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.next?;
        self.next = cur.caused_by.as_deref();
        Some(cur)
    }
}

/// Conversion used by the logging macros for the trailing error argument.
///
/// Implemented for references to any `std::error::Error`, for an owned
/// `anyhow::Error`, and for an already captured `LoggedError`.
pub trait IntoLoggedError {
    fn into_logged_error(self) -> LoggedError;
}

impl<E: Error + 'static> IntoLoggedError for &E {
    fn into_logged_error(self) -> LoggedError {
        LoggedError::from_error(self)
    }
}

impl IntoLoggedError for &(dyn Error + 'static) {
    fn into_logged_error(self) -> LoggedError {
        LoggedError::from_error(self)
    }
}

impl IntoLoggedError for &(dyn Error + Send + Sync + 'static) {
    fn into_logged_error(self) -> LoggedError {
        LoggedError::from_error(self)
    }
}

// By value: a `&anyhow::Error` impl would overlap the blanket `&E` impl.
// Borrowing callers use `LoggedError::from_anyhow(&err)`.
impl IntoLoggedError for anyhow::Error {
    fn into_logged_error(self) -> LoggedError {
        LoggedError::from_anyhow(&self)
    }
}

impl IntoLoggedError for LoggedError {
    fn into_logged_error(self) -> LoggedError {
        self
    }
}

impl IntoLoggedError for &LoggedError {
    fn into_logged_error(self) -> LoggedError {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    enum StoreError {
        #[error("failed to load order {0}")]
        Load(u32, #[source] std::io::Error),
    }

    fn nested() -> StoreError {
        StoreError::Load(
            42,
            std::io::Error::new(std::io::ErrorKind::NotFound, "orders.db missing"),
        )
    }

    #[test]
    fn captures_full_source_chain() {
        let err = nested();
        let logged = LoggedError::from_error(&err);

        assert_eq!(logged.message, "failed to load order 42");
        assert!(logged.detail.starts_with("Load(42"));
        assert_eq!(logged.depth(), 2);
        assert_eq!(logged.root_cause().message, "orders.db missing");
    }

    #[test]
    fn alternate_display_joins_causes() {
        let logged = LoggedError::from_error(&nested());
        assert_eq!(logged.to_string(), "failed to load order 42");
        assert_eq!(
            format!("{logged:#}"),
            "failed to load order 42: orders.db missing"
        );
    }

    #[test]
    fn anyhow_context_becomes_chain_links() {
        let err = anyhow::Error::new(nested()).context("checkout aborted");
        let logged = LoggedError::from_anyhow(&err);

        let messages: Vec<_> = logged.chain().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "checkout aborted",
                "failed to load order 42",
                "orders.db missing"
            ]
        );
    }

    #[test]
    fn serializes_as_nested_objects() {
        let logged = LoggedError::message("outer").with_cause(LoggedError::message("inner"));
        let json = serde_json::to_value(&logged).unwrap();
        assert_eq!(json["message"], "outer");
        assert_eq!(json["caused_by"]["message"], "inner");
        assert!(json["caused_by"].get("caused_by").is_none());
        assert!(json.get("trace").is_none());
    }
}
