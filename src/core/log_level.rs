//! Log level definitions

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Severity of a log event.
///
/// `Unknown` is the sentinel for "no/invalid level". It sorts below every
/// real level but is never produced by the logging macros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    #[default]
    Unknown = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl LogLevel {
    /// All levels usable for filtering, in ascending severity.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Unknown => "UNKNOWN",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Parse a level name.
    ///
    /// Accepts the canonical upper-case names and their all-lower-case
    /// spellings. Anything else (including mixed case) yields
    /// [`LogLevel::Unknown`].
    ///
    /// ```
    /// use pattern_logger::LogLevel;
    ///
    /// assert_eq!(LogLevel::from_name("warn"), LogLevel::Warn);
    /// assert_eq!(LogLevel::from_name("ERROR"), LogLevel::Error);
    /// assert_eq!(LogLevel::from_name("Error"), LogLevel::Unknown);
    /// ```
    pub fn from_name(s: &str) -> Self {
        match s {
            "debug" | "DEBUG" => LogLevel::Debug,
            "info" | "INFO" => LogLevel::Info,
            "warn" | "WARN" => LogLevel::Warn,
            "error" | "ERROR" => LogLevel::Error,
            "fatal" | "FATAL" => LogLevel::Fatal,
            _ => LogLevel::Unknown,
        }
    }

    /// The level as a usable filter threshold; `None` for `Unknown`.
    pub fn as_filter(self) -> Option<Self> {
        match self {
            LogLevel::Unknown => None,
            level => Some(level),
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Unknown => BrightBlack,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(LogLevel::from_name(s))
    }
}

/// Serialized as the canonical name (`"INFO"`).
impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_str())
    }
}

/// Accepts the same spellings as [`LogLevel::from_name`]; names that parse
/// to `Unknown` are rejected.
impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        LogLevel::from_name(&name).as_filter().ok_or_else(|| {
            de::Error::invalid_value(
                Unexpected::Str(&name),
                &"a level name such as DEBUG, info or WARN",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for level in LogLevel::ALL {
            assert_eq!(LogLevel::from_name(level.to_str()), level);
            assert_eq!(LogLevel::from_name(&level.to_str().to_lowercase()), level);
        }
    }

    #[test]
    fn test_unrecognized_names() {
        assert_eq!(LogLevel::from_name(""), LogLevel::Unknown);
        assert_eq!(LogLevel::from_name("Info"), LogLevel::Unknown);
        assert_eq!(LogLevel::from_name("WARNING"), LogLevel::Unknown);
        assert_eq!(LogLevel::from_name("UNKNOWN"), LogLevel::Unknown);
        assert_eq!("trace".parse::<LogLevel>(), Ok(LogLevel::Unknown));
    }

    #[test]
    fn test_ordering() {
        assert!(LogLevel::Unknown < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
    }

    #[test]
    fn test_serde_uses_level_names() {
        assert_eq!(serde_json::to_string(&LogLevel::Warn).unwrap(), "\"WARN\"");
        assert_eq!(
            serde_json::from_str::<LogLevel>("\"INFO\"").unwrap(),
            LogLevel::Info
        );
        assert_eq!(
            serde_json::from_str::<LogLevel>("\"fatal\"").unwrap(),
            LogLevel::Fatal
        );
    }

    #[test]
    fn test_serde_rejects_unusable_names() {
        for name in ["\"Info\"", "\"UNKNOWN\"", "\"trace\"", "3"] {
            assert!(serde_json::from_str::<LogLevel>(name).is_err(), "{}", name);
        }
    }

    #[test]
    fn test_as_filter() {
        assert_eq!(LogLevel::Unknown.as_filter(), None);
        assert_eq!(LogLevel::Error.as_filter(), Some(LogLevel::Error));
    }

    #[test]
    fn test_display() {
        assert_eq!(LogLevel::Unknown.to_string(), "UNKNOWN");
        assert_eq!(format!("[{}]", LogLevel::Warn), "[WARN]");
    }
}
