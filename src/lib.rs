//! # Pattern Logger
//!
//! A structured logging library driven by printf-like layout patterns.
//!
//! ## Features
//!
//! - **Pattern Layouts**: `%d{%H:%M:%S} [%p] %c %m%n` style templates compiled once
//! - **Named Loggers**: a registry with lazy creation and a root fallback
//! - **Multiple Appenders**: console and daily-reopened file sinks, or your own
//! - **Thread Safe**: loggers, appenders and the registry can be shared freely
//!
//! ## Quick start
//!
//! ```
//! use pattern_logger::prelude::*;
//! use pattern_logger::info;
//!
//! let registry = LoggerRegistry::new();
//! let logger = registry.get_logger("app");
//! info!(logger, "listening on port {}", 8080);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender};
    pub use crate::core::{
        Appender, AppenderConfig, AppenderSettings, LogEvent, LogEventGuard, LogFormatter,
        LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
        LoggerRegistry, RegistryBuilder, Result, Timezone,
    };
}

pub use appenders::{ConsoleAppender, FileAppender};
pub use core::{
    compile, Appender, AppenderConfig, AppenderSettings, Clock, CompiledPattern, FormatItem,
    LogEvent, LogEventGuard, LogFormatter, LogLevel, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, LoggerMetrics, LoggerRegistry, PatternError, RegistryBuilder, Result,
    SystemClock, Timezone, DEFAULT_PATTERN, ROOT_LOGGER_NAME,
};
