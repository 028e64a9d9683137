//! Pattern-based log formatter

use super::error::{LoggerError, Result};
use super::format_item::FormatItem;
use super::log_event::LogEvent;
use super::log_level::LogLevel;
use super::logger::Logger;
use super::pattern::{self, PatternError};
use super::timestamp::Timezone;
use std::fmt::{self, Write};

/// Pattern used by every logger unless configured otherwise.
pub const DEFAULT_PATTERN: &str = "%d{%Y-%m-%d %H:%M:%S}%T%t%T%N%T%F%T[%p]%T[%c]%T%f:%l%T%m%n";

/// A compiled pattern.
///
/// The pattern is parsed once on construction; formatting an event only
/// walks the item list.
///
/// # Examples
///
/// ```
/// use pattern_logger::{LogFormatter, Timezone};
///
/// let formatter = LogFormatter::new("[%p] %c: %m%n").with_timezone(Timezone::Utc);
/// assert!(!formatter.is_error());
/// assert_eq!(formatter.pattern(), "[%p] %c: %m%n");
///
/// let broken = LogFormatter::new("%Q");
/// assert!(broken.is_error());
/// ```
#[derive(Debug, Clone)]
pub struct LogFormatter {
    pattern: String,
    items: Vec<FormatItem>,
    has_error: bool,
    timezone: Timezone,
}

impl LogFormatter {
    /// Compile `pattern`. Never fails; check [`LogFormatter::is_error`].
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let compiled = pattern::compile(&pattern);
        Self {
            pattern,
            items: compiled.items,
            has_error: compiled.has_error,
            timezone: Timezone::default(),
        }
    }

    /// Compile `pattern`, rejecting it if any directive failed.
    pub fn parse(pattern: impl Into<String>) -> Result<Self> {
        let formatter = Self::new(pattern);
        if formatter.has_error {
            let errors = formatter.errors();
            return Err(LoggerError::invalid_pattern(formatter.pattern, errors));
        }
        Ok(formatter)
    }

    /// Set the timezone used by `%d`.
    #[must_use]
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn items(&self) -> &[FormatItem] {
        &self.items
    }

    pub fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Whether any directive failed to compile.
    pub fn is_error(&self) -> bool {
        self.has_error
    }

    /// Compile errors embedded in the pattern, in source order.
    pub fn errors(&self) -> Vec<PatternError> {
        pattern::collect_errors(&self.items)
    }

    /// Render `event` as dispatched by `logger` at `level`.
    pub fn format(&self, logger: &Logger, level: LogLevel, event: &LogEvent) -> String {
        let mut out = String::with_capacity(self.pattern.len() + event.content().len() + 32);
        // Writing into a String only fails if a timestamp cannot be shown;
        // whatever was rendered up to that point is kept.
        let _ = self.write_to(&mut out, logger, level, event);
        out
    }

    /// Render `event` into `out`.
    pub fn write_to<W: Write>(
        &self,
        out: &mut W,
        logger: &Logger,
        level: LogLevel,
        event: &LogEvent,
    ) -> fmt::Result {
        for item in &self.items {
            item.render(out, logger, level, event, self.timezone)?;
        }
        Ok(())
    }
}

impl Default for LogFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}
