//! Renderable units produced by the pattern compiler

use super::log_event::LogEvent;
use super::log_level::LogLevel;
use super::logger::Logger;
use super::pattern::PatternError;
use super::timestamp::{self, Timezone, DEFAULT_DATE_FORMAT};
use std::fmt::{self, Write};

/// One compiled piece of a pattern.
///
/// There is one variant per directive key plus literal text and inline
/// error markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatItem {
    /// `%m`
    Message,
    /// `%p`
    Level,
    /// `%r`
    Elapsed,
    /// `%c`
    LoggerName,
    /// `%t`
    ThreadId,
    /// `%n`
    NewLine,
    /// `%d{...}`, holding a strftime sub-pattern
    DateTime(String),
    /// `%f`
    FileName,
    /// `%l`
    Line,
    /// `%T`
    Tab,
    /// `%F`
    FiberId,
    /// `%N`
    ThreadName,
    /// Text copied verbatim
    Literal(String),
    /// A directive that failed to compile, rendered as its marker text
    Error(PatternError),
}

impl FormatItem {
    /// Build the item for directive `key` with its braced `argument`.
    ///
    /// Returns `None` for keys outside the directive table.
    pub fn from_directive(key: &str, argument: &str) -> Option<Self> {
        let item = match key {
            "m" => FormatItem::Message,
            "p" => FormatItem::Level,
            "r" => FormatItem::Elapsed,
            "c" => FormatItem::LoggerName,
            "t" => FormatItem::ThreadId,
            "n" => FormatItem::NewLine,
            "d" => FormatItem::date_time(argument),
            "f" => FormatItem::FileName,
            "l" => FormatItem::Line,
            "T" => FormatItem::Tab,
            "F" => FormatItem::FiberId,
            "N" => FormatItem::ThreadName,
            _ => return None,
        };
        Some(item)
    }

    /// Timestamp item; empty or unrenderable sub-patterns use the default.
    pub fn date_time(format: &str) -> Self {
        if format.is_empty() || !timestamp::is_valid_format(format) {
            FormatItem::DateTime(DEFAULT_DATE_FORMAT.to_string())
        } else {
            FormatItem::DateTime(format.to_string())
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FormatItem::Error(_))
    }

    /// Render this item.
    ///
    /// `logger` is the logger dispatching the event. The `%c` directive
    /// reads the event's own logger instead, so events forwarded to the
    /// root logger keep their originating name.
    pub fn render<W: Write>(
        &self,
        out: &mut W,
        _logger: &Logger,
        level: LogLevel,
        event: &LogEvent,
        timezone: Timezone,
    ) -> fmt::Result {
        match self {
            FormatItem::Message => out.write_str(event.content()),
            FormatItem::Level => out.write_str(level.to_str()),
            FormatItem::Elapsed => write!(out, "{}", event.elapse()),
            FormatItem::LoggerName => out.write_str(event.logger().name()),
            FormatItem::ThreadId => write!(out, "{}", event.thread_id()),
            FormatItem::NewLine => out.write_char('\n'),
            FormatItem::DateTime(format) => {
                timestamp::write_unix(out, event.time(), format, timezone)
            }
            FormatItem::FileName => out.write_str(event.file()),
            FormatItem::Line => write!(out, "{}", event.line()),
            FormatItem::Tab => out.write_char('\t'),
            FormatItem::FiberId => write!(out, "{}", event.fiber_id()),
            FormatItem::ThreadName => out.write_str(event.thread_name()),
            FormatItem::Literal(text) => out.write_str(text),
            FormatItem::Error(error) => write!(out, "{}", error),
        }
    }
}
