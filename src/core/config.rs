//! Serializable logger configuration
//!
//! These types describe a logger and its appenders. Applications load them
//! with whatever serde format they already use and hand them to
//! [`LoggerRegistry::apply`](crate::LoggerRegistry::apply); live loggers can
//! be dumped back with [`Logger::to_config`](crate::Logger::to_config).

use super::appender::Appender;
use super::error::{LoggerError, Result};
use super::formatter::LogFormatter;
use super::log_level::LogLevel;
use crate::appenders::{ConsoleAppender, FileAppender};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration of one logger.
///
/// # Examples
///
/// ```
/// use pattern_logger::{AppenderConfig, LogLevel, LoggerConfig};
///
/// let config = LoggerConfig::new("db")
///     .with_level(LogLevel::Warn)
///     .with_pattern("%d%T[%p]%T%m%n")
///     .with_appender(AppenderConfig::console());
/// assert_eq!(config.appenders.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default)]
    pub appenders: Vec<AppenderConfig>,
}

impl LoggerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: None,
            pattern: None,
            appenders: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn with_appender(mut self, appender: AppenderConfig) -> Self {
        self.appenders.push(appender);
        self
    }

    /// Check the level and every pattern without touching any logger.
    pub fn validate(&self) -> Result<()> {
        check_level(self.level, || format!("logger '{}'", self.name))?;
        if let Some(pattern) = &self.pattern {
            LogFormatter::parse(pattern.as_str())?;
        }
        for appender in &self.appenders {
            appender.validate()?;
        }
        Ok(())
    }
}

/// Configuration of one appender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppenderConfig {
    Console {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<LogLevel>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },
    File {
        path: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<LogLevel>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },
    /// An application-defined appender; reported by snapshots but cannot
    /// be built from configuration.
    Custom {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<LogLevel>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },
}

impl AppenderConfig {
    pub fn console() -> Self {
        AppenderConfig::Console {
            level: None,
            pattern: None,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        AppenderConfig::File {
            path: path.into(),
            level: None,
            pattern: None,
        }
    }

    fn parts(&self) -> (Option<LogLevel>, Option<&str>) {
        match self {
            AppenderConfig::Console { level, pattern }
            | AppenderConfig::File { level, pattern, .. }
            | AppenderConfig::Custom { level, pattern, .. } => (*level, pattern.as_deref()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let AppenderConfig::Custom { name, .. } = self {
            return Err(custom_not_buildable(name));
        }
        let (level, pattern) = self.parts();
        check_level(level, || "appender".to_string())?;
        if let Some(pattern) = pattern {
            LogFormatter::parse(pattern)?;
        }
        Ok(())
    }

    /// Construct the described appender.
    ///
    /// A file appender whose target cannot be opened yet is still
    /// returned; it retries on each write.
    pub fn build(&self) -> Result<Arc<dyn Appender>> {
        self.validate()?;
        let appender: Arc<dyn Appender> = match self {
            AppenderConfig::Console { .. } => Arc::new(ConsoleAppender::new()),
            AppenderConfig::File { path, .. } => Arc::new(FileAppender::new(path)),
            AppenderConfig::Custom { name, .. } => return Err(custom_not_buildable(name)),
        };

        let (level, pattern) = self.parts();
        if let Some(level) = level {
            appender.set_level(level);
        }
        if let Some(pattern) = pattern {
            appender.set_formatter(Some(Arc::new(LogFormatter::parse(pattern)?)));
        }
        Ok(appender)
    }
}

/// `Unknown` is never written by snapshots, so it is rejected on input.
fn check_level(level: Option<LogLevel>, component: impl FnOnce() -> String) -> Result<()> {
    if level == Some(LogLevel::Unknown) {
        return Err(LoggerError::config(
            component(),
            "level UNKNOWN cannot be used for filtering",
        ));
    }
    Ok(())
}

fn custom_not_buildable(name: &str) -> LoggerError {
    LoggerError::config(
        format!("appender '{}'", name),
        "custom appenders cannot be built from configuration",
    )
}
