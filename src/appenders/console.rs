//! Console appender implementation

use crate::core::{Appender, AppenderConfig, AppenderSettings, LogLevel, LoggerError, Result};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;

/// Writes rendered records to standard output.
///
/// By default every record goes to stdout exactly as rendered.
pub struct ConsoleAppender {
    settings: AppenderSettings,
    use_colors: bool,
    stderr_for_errors: bool,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            settings: AppenderSettings::new(),
            use_colors: false,
            stderr_for_errors: false,
        }
    }

    /// Color each record by its level.
    ///
    /// Has no effect unless the `console` feature is enabled.
    ///
    /// # Example
    ///
    /// ```
    /// use pattern_logger::appenders::ConsoleAppender;
    ///
    /// let appender = ConsoleAppender::new().with_colors(true);
    /// ```
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Route ERROR and FATAL records to stderr instead of stdout.
    #[must_use]
    pub fn with_stderr_for_errors(mut self, enabled: bool) -> Self {
        self.stderr_for_errors = enabled;
        self
    }

    fn paint(&self, level: LogLevel, record: &str) -> String {
        #[cfg(feature = "console")]
        if self.use_colors {
            return record.color(level.color_code()).to_string();
        }
        let _ = level;
        record.to_string()
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn settings(&self) -> &AppenderSettings {
        &self.settings
    }

    fn write_record(&self, level: LogLevel, record: &str) -> Result<()> {
        let painted;
        let output = if self.use_colors {
            painted = self.paint(level, record);
            painted.as_str()
        } else {
            record
        };

        let to_stderr = self.stderr_for_errors && level >= LogLevel::Error;
        let written = if to_stderr {
            std::io::stderr().lock().write_all(output.as_bytes())
        } else {
            std::io::stdout().lock().write_all(output.as_bytes())
        };
        written.map_err(|e| LoggerError::io_operation("writing to console", "write failed", e))
    }

    fn flush(&self) -> Result<()> {
        // Flush both stdout and stderr since we may write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }

    fn to_config(&self) -> AppenderConfig {
        AppenderConfig::Console {
            level: self.level().as_filter(),
            pattern: self.own_pattern(),
        }
    }
}
