//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod format_item;
pub mod formatter;
pub mod log_event;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod pattern;
pub mod registry;
pub mod timestamp;

pub use appender::{Appender, AppenderSettings};
pub use config::{AppenderConfig, LoggerConfig};
pub use error::{LoggerError, Result};
pub use format_item::FormatItem;
pub use formatter::{LogFormatter, DEFAULT_PATTERN};
pub use log_event::{LogEvent, LogEventGuard};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use pattern::{compile, CompiledPattern, PatternError};
pub use registry::{LoggerRegistry, RegistryBuilder, ROOT_LOGGER_NAME};
pub use timestamp::{Clock, SystemClock, Timezone};
