//! Appender trait for log output destinations

use super::config::AppenderConfig;
use super::error::Result;
use super::formatter::LogFormatter;
use super::log_event::LogEvent;
use super::log_level::LogLevel;
use super::logger::Logger;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Default)]
struct FormatterSlot {
    formatter: Option<Arc<LogFormatter>>,
    /// Set explicitly on the appender rather than inherited from a logger
    owned: bool,
}

/// Minimum level and formatter shared by every appender.
#[derive(Debug)]
pub struct AppenderSettings {
    level: RwLock<LogLevel>,
    slot: RwLock<FormatterSlot>,
}

impl AppenderSettings {
    pub fn new() -> Self {
        Self {
            level: RwLock::new(LogLevel::Debug),
            slot: RwLock::new(FormatterSlot::default()),
        }
    }

    pub fn level(&self) -> LogLevel {
        *self.level.read()
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.level.write() = level;
    }

    pub fn formatter(&self) -> Option<Arc<LogFormatter>> {
        self.slot.read().formatter.clone()
    }

    /// Set (or with `None`, clear) this appender's own formatter.
    pub fn set_formatter(&self, formatter: Option<Arc<LogFormatter>>) {
        let mut slot = self.slot.write();
        slot.owned = formatter.is_some();
        slot.formatter = formatter;
    }

    /// Whether the formatter was set on the appender itself.
    pub fn has_formatter(&self) -> bool {
        self.slot.read().owned
    }

    /// Install `formatter` only if the appender has none at all.
    pub(crate) fn fill_formatter(&self, formatter: &Arc<LogFormatter>) {
        let mut slot = self.slot.write();
        if slot.formatter.is_none() {
            slot.formatter = Some(Arc::clone(formatter));
        }
    }

    /// Replace an inherited formatter; appenders with their own keep it.
    pub(crate) fn inherit_formatter(&self, formatter: &Arc<LogFormatter>) {
        let mut slot = self.slot.write();
        if !slot.owned {
            slot.formatter = Some(Arc::clone(formatter));
        }
    }
}

impl Default for AppenderSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// An output sink attached to one or more loggers.
///
/// Implementors provide [`AppenderSettings`] and a sink for rendered
/// records; level gating and formatting come from the provided
/// [`Appender::log`].
pub trait Appender: Send + Sync {
    fn settings(&self) -> &AppenderSettings;

    /// Write one fully rendered record to the sink.
    fn write_record(&self, level: LogLevel, record: &str) -> Result<()>;

    fn flush(&self) -> Result<()>;

    fn name(&self) -> &str;

    /// Describe this appender for configuration snapshots.
    fn to_config(&self) -> AppenderConfig {
        AppenderConfig::Custom {
            name: self.name().to_string(),
            level: self.level().as_filter(),
            pattern: self.own_pattern(),
        }
    }

    /// Render `event` and write it, unless `level` is below this
    /// appender's minimum or no formatter is available yet.
    fn log(&self, logger: &Logger, level: LogLevel, event: &LogEvent) -> Result<()> {
        if level < self.level() {
            return Ok(());
        }
        let Some(formatter) = self.formatter() else {
            return Ok(());
        };
        let record = formatter.format(logger, level, event);
        self.write_record(level, &record)
    }

    fn level(&self) -> LogLevel {
        self.settings().level()
    }

    fn set_level(&self, level: LogLevel) {
        self.settings().set_level(level);
    }

    fn formatter(&self) -> Option<Arc<LogFormatter>> {
        self.settings().formatter()
    }

    fn set_formatter(&self, formatter: Option<Arc<LogFormatter>>) {
        self.settings().set_formatter(formatter);
    }

    fn has_formatter(&self) -> bool {
        self.settings().has_formatter()
    }

    /// Pattern of the appender's own formatter, if it has one.
    fn own_pattern(&self) -> Option<String> {
        if self.has_formatter() {
            self.formatter().map(|f| f.pattern().to_string())
        } else {
            None
        }
    }
}
