//! Leveled logging macros for [`Logger`](crate::log::Logger).
//!
//! ```ignore
//! logger_info!(logger, "user {} logged in from {}", user.name, addr);
//! logger_error!(logger, "failed to load order {}", id; &err);
//! ```
//!
//! The template must be a string literal. Its `{}` count is checked against
//! the argument count at compile time, and the level check runs before any
//! argument expression is evaluated. An optional trailing error follows a
//! `;` and is attached to the record as a [`LoggedError`](crate::log::LoggedError)
//! rather than rendered into the message. Pass errors by reference (`&err`),
//! or an owned `anyhow::Error`.
//!
//! # Feature Flags
//! Specific log levels are controlled by cargo features:
//! `log-debug`, `log-info`, `log-warn`, `log-error`.
//!
//! If a feature is disabled, the corresponding macro expands to `()`, removing
//! all formatting and argument evaluation at compile time.

// ============================================================================
// 1. GENERIC INTERNAL MACROS (The "Workers")
// ============================================================================

#[doc(hidden)]
#[macro_export]
macro_rules! __paramlog_count {
    () => { 0usize };
    ($head:expr $(, $tail:expr)*) => { 1usize + $crate::__paramlog_count!($($tail),*) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __paramlog_error {
    () => {
        ::core::option::Option::None
    };
    ($err:expr) => {
        ::core::option::Option::Some($crate::log::logged_error::IntoLoggedError::into_logged_error(
            $err,
        ))
    };
}

/// Logs at a level chosen at runtime. The level-specific macros below are
/// feature gated; this one is not.
#[macro_export]
macro_rules! logger_log {
    ($logger:expr, $lvl:expr, $template:literal $(, $arg:expr)* $(; $err:expr)?) => {{
        #[allow(clippy::assertions_on_constants)]
        const _: () = ::core::assert!(
            $crate::log::template::is_well_formed($template)
                && $crate::log::template::placeholder_count($template)
                    == $crate::__paramlog_count!($($arg),*),
            "log template placeholders do not match the number of arguments"
        );
        let __logger = &$logger;
        let __lvl: $crate::log::log_level::LogLevel = $lvl;
        if __logger.is_enabled(__lvl) {
            __logger.emit(
                __lvl,
                $template,
                ::std::vec![$( ::std::string::ToString::to_string(&$arg) ),*],
                $crate::__paramlog_error!($($err)?),
            );
        }
    }};
}

// ============================================================================
// 2. LEVEL-SPECIFIC MACROS (Feature Gated)
// ============================================================================

// ---------------------- DEBUG ----------------------
#[cfg(feature = "log-debug")]
#[macro_export]
macro_rules! logger_debug { ($logger:expr, $($rest:tt)*) => { $crate::logger_log!($logger, $crate::log::log_level::LogLevel::Debug, $($rest)*) } }

#[cfg(not(feature = "log-debug"))]
#[macro_export]
macro_rules! logger_debug {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- INFO ----------------------
#[cfg(feature = "log-info")]
#[macro_export]
macro_rules! logger_info { ($logger:expr, $($rest:tt)*) => { $crate::logger_log!($logger, $crate::log::log_level::LogLevel::Info, $($rest)*) } }

#[cfg(not(feature = "log-info"))]
#[macro_export]
macro_rules! logger_info {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- WARN ----------------------
#[cfg(feature = "log-warn")]
#[macro_export]
macro_rules! logger_warn { ($logger:expr, $($rest:tt)*) => { $crate::logger_log!($logger, $crate::log::log_level::LogLevel::Warn, $($rest)*) } }

#[cfg(not(feature = "log-warn"))]
#[macro_export]
macro_rules! logger_warn {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- ERROR ----------------------
// Generally always enabled, but consistent structure allows user to disable if really needed.
#[cfg(feature = "log-error")]
#[macro_export]
macro_rules! logger_error { ($logger:expr, $($rest:tt)*) => { $crate::logger_log!($logger, $crate::log::log_level::LogLevel::Error, $($rest)*) } }

#[cfg(not(feature = "log-error"))]
#[macro_export]
macro_rules! logger_error {
    ($($arg:tt)*) => {
        ()
    };
}
