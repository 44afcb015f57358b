//! Level-gated, parameterized logging.
//!
//! A [`Logger`] belongs to one component and reads that component's
//! [`LevelThreshold`] on every call. Enabled calls render their `{}` template,
//! capture a trailing error as a [`LoggedError`], and hand a [`LogRecord`] to a
//! [`LogSink`]. Put a [`QueuedSink`] in front of any sink that does I/O so
//! logging never blocks the caller.

pub mod lazy_arg;
pub mod level_threshold;
pub mod log_bridge;
pub mod log_level;
pub mod log_macros;
pub mod log_manager;
pub mod log_record;
pub mod log_sink;
pub mod logged_error;
pub mod logger;
pub mod memory_sink;
pub mod noop_log_sink;
pub mod queue_handle;
pub mod queued_sink;
pub mod template;

pub use lazy_arg::{Lazy, lazy};
pub use level_threshold::{LEVEL_ENV_VAR, LevelThreshold, ThresholdRegistry};
pub use log_bridge::LogBridge;
pub use log_level::{LogLevel, ParseLevelError};
pub use log_manager::LogManager;
pub use log_record::LogRecord;
pub use log_sink::LogSink;
pub use logged_error::{IntoLoggedError, LoggedError};
pub use logger::Logger;
pub use memory_sink::MemorySink;
pub use noop_log_sink::NoopLogSink;
pub use queue_handle::{EnqueueError, QueueHandle};
pub use queued_sink::QueuedSink;
pub use template::TemplateError;
