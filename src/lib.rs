//! paramlog is a structured logging facade built around a few rules:
//!
//! - every event has a level, and calls below the component's threshold cost
//!   a single atomic load;
//! - messages are literal templates with positional `{}` placeholders, filled
//!   in only after the level check;
//! - errors travel as structured data with their cause chain, never as text
//!   glued into the message.
//!
//! ```rust
//! use std::sync::Arc;
//! use paramlog::log::{LogLevel, LogManager, MemorySink, ThresholdRegistry};
//! use paramlog::{logger_debug, logger_info};
//!
//! let sink = Arc::new(MemorySink::new());
//! let registry = Arc::new(ThresholdRegistry::new(LogLevel::Info));
//! let manager = LogManager::new(registry, sink.clone());
//!
//! let checkout = manager.logger("checkout");
//! logger_info!(checkout, "order {} placed by {}", 1042, "alice");
//! logger_debug!(checkout, "cart contents: {}", "not rendered");
//!
//! assert_eq!(sink.messages(), vec!["order 1042 placed by alice"]);
//! ```

/// Handles configuration loading and management.
pub mod config;
/// Logging facade, thresholds, records and sinks.
pub mod log;
