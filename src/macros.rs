//! Logging macros for ergonomic call-site logging.
//!
//! These macros capture the source file and line, skip all formatting work
//! when the logger's level filters the event out, and otherwise format the
//! message like `format!` before dispatching.
//!
//! # Examples
//!
//! ```
//! use pattern_logger::prelude::*;
//! use pattern_logger::info;
//!
//! let registry = LoggerRegistry::new();
//! let logger = registry.get_logger("server");
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at an explicit level.
///
/// `$logger` must evaluate to an `Arc<Logger>` (or a reference to one).
///
/// # Examples
///
/// ```
/// # use pattern_logger::prelude::*;
/// # let logger = std::sync::Arc::new(Logger::new("app"));
/// use pattern_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger: &::std::sync::Arc<$crate::Logger> = &$logger;
        let level: $crate::LogLevel = $level;
        if logger.enabled(level) {
            let mut event = $crate::LogEvent::new(::std::sync::Arc::clone(logger), level)
                .with_location(file!(), line!());
            event.format(format_args!($($arg)+));
            logger.log(level, &event);
        }
    }};
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use pattern_logger::prelude::*;
/// # let logger = std::sync::Arc::new(Logger::new("app"));
/// use pattern_logger::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use pattern_logger::prelude::*;
/// # let logger = std::sync::Arc::new(Logger::new("app"));
/// use pattern_logger::error;
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Start a stream-style event that is dispatched when it goes out of scope.
///
/// Evaluates to a [`LogEventGuard`](crate::LogEventGuard) carrying the
/// call site's file and line.
///
/// # Examples
///
/// ```
/// # use pattern_logger::prelude::*;
/// # let logger = std::sync::Arc::new(Logger::new("app"));
/// use pattern_logger::log_event;
///
/// let mut event = log_event!(logger, LogLevel::Warn);
/// event.append("queue depth ").append(128);
/// drop(event);
/// ```
#[macro_export]
macro_rules! log_event {
    ($logger:expr, $level:expr) => {{
        let logger: &::std::sync::Arc<$crate::Logger> = &$logger;
        $crate::LogEventGuard::new(
            $crate::LogEvent::new(::std::sync::Arc::clone(logger), $level)
                .with_location(file!(), line!()),
        )
    }};
}
