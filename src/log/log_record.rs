use std::{fmt, sync::Arc};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::log::{log_level::LogLevel, logged_error::LoggedError};

/// Represents a single emitted log event.
///
/// A record is built only after the level check passed, and is moved into the
/// sink; nothing holds on to it or mutates it afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    /// The severity level of the event.
    pub level: LogLevel,
    /// The literal the message was rendered from.
    pub template: &'static str,
    /// String forms of the substituted arguments, in placeholder order.
    pub args: Vec<String>,
    /// `template` with every `{}` replaced by the matching argument.
    pub message: String,
    /// Trailing error, if one was supplied. Never part of `message`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<LoggedError>,
    /// Name of the component whose logger emitted the event.
    pub component: Arc<str>,
    /// Wall-clock time the record was built.
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    /// Creates a new `LogRecord` stamped with the current time.
    ///
    /// # Example
    ///
    /// ```rust
    /// use paramlog::log::{LogLevel, LogRecord};
    ///
    /// let rec = LogRecord::new(
    ///     LogLevel::Info,
    ///     "user {} connected",
    ///     vec!["alice".into()],
    ///     "user alice connected".into(),
    ///     "sessions".into(),
    /// );
    /// assert!(rec.error.is_none());
    /// ```
    #[must_use]
    pub fn new(
        level: LogLevel,
        template: &'static str,
        args: Vec<String>,
        message: String,
        component: Arc<str>,
    ) -> Self {
        Self {
            level,
            template,
            args,
            message,
            error: None,
            component,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: Option<LoggedError>) -> Self {
        self.error = error;
        self
    }

    /// JSON form for tooling that consumes records as data.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// One-line form: `2026-10-16T09:30:00.123Z INFO  [component] message (error: a: b)`.
impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<5} [{}] {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.level,
            self.component,
            self.message
        )?;
        if let Some(err) = &self.error {
            write!(f, " (error: {err:#})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    fn sample() -> LogRecord {
        LogRecord::new(
            LogLevel::Warn,
            "retrying {} in {}ms",
            vec!["fetch".into(), "250".into()],
            "retrying fetch in 250ms".into(),
            "jobs".into(),
        )
    }

    #[test]
    fn display_includes_level_component_and_message() {
        let line = sample().to_string();
        assert!(line.contains("WARN  [jobs] retrying fetch in 250ms"), "{line}");
        assert!(!line.contains("error:"));
    }

    #[test]
    fn display_appends_error_chain() {
        let rec = sample().with_error(Some(
            LoggedError::message("timeout").with_cause(LoggedError::message("socket closed")),
        ));
        assert!(rec.to_string().ends_with("(error: timeout: socket closed)"));
    }

    #[test]
    fn json_keeps_template_args_and_error_separate() {
        let rec = sample().with_error(Some(LoggedError::message("timeout")));
        let v: serde_json::Value = serde_json::from_str(&rec.to_json().unwrap()).unwrap();

        assert_eq!(v["level"], "WARN");
        assert_eq!(v["template"], "retrying {} in {}ms");
        assert_eq!(v["args"][1], "250");
        assert_eq!(v["component"], "jobs");
        assert_eq!(v["error"]["message"], "timeout");
        assert!(v["timestamp"].is_string());
    }
}
