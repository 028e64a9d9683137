//! Property-based tests for pattern_logger using proptest

use proptest::prelude::*;
use pattern_logger::prelude::*;
use pattern_logger::{compile, FormatItem};
use std::sync::Arc;

fn real_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

fn render(pattern: &str, message: &str) -> String {
    let logger = Arc::new(Logger::new("prop"));
    let mut event = LogEvent::new(Arc::clone(&logger), LogLevel::Info)
        .with_location("prop.rs", 1)
        .with_time(0);
    event.append(message);
    LogFormatter::new(pattern).format(&logger, LogLevel::Info, &event)
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Level names parse back to the same level
    #[test]
    fn test_log_level_str_roundtrip(level in real_level()) {
        prop_assert_eq!(LogLevel::from_name(level.to_str()), level);
        prop_assert_eq!(LogLevel::from_name(&level.to_str().to_lowercase()), level);
    }

    /// Anything that is not a level name parses to Unknown
    #[test]
    fn test_unrecognized_names_are_unknown(name in "[a-z]{0,3}|[A-Z]{6,10}") {
        let parsed: LogLevel = name.parse().unwrap();
        prop_assert_eq!(parsed, LogLevel::Unknown);
    }

    /// A WARN logger passes exactly the levels at or above WARN
    #[test]
    fn test_logger_threshold(level in real_level()) {
        let logger = Logger::new("threshold");
        logger.set_level(LogLevel::Warn);
        prop_assert_eq!(logger.enabled(level), level >= LogLevel::Warn);
    }
}

// ============================================================================
// Pattern Tests
// ============================================================================

proptest! {
    /// Literal-only patterns render unchanged
    #[test]
    fn test_literal_pattern_renders_verbatim(text in "[^%]{0,64}", message in ".{0,16}") {
        let compiled = compile(&text);
        prop_assert!(!compiled.has_error);
        prop_assert_eq!(render(&text, &message), text);
    }

    /// `%%` renders as a single percent sign wherever it appears
    #[test]
    fn test_escaped_percent(prefix in "[a-z ]{0,8}", suffix in "[a-z ]{0,8}") {
        let pattern = format!("{}%%{}%%m", prefix, suffix);
        prop_assert_eq!(render(&pattern, "msg"), format!("{}%{}%m", prefix, suffix));
    }

    /// Known directives never set the error flag, unknown single letters always do
    #[test]
    fn test_directive_resolution(key in "[a-zA-Z]") {
        let known = "mprctndflTFN".contains(key.as_str());
        let compiled = compile(&format!("%{}", key));
        prop_assert_eq!(compiled.has_error, !known);
        if !known {
            let expected = format!("<<error_format %{}>>", key);
            prop_assert_eq!(render(&format!("%{}", key), ""), expected);
        }
    }

    /// Compilation is total: any input yields items, and the flag matches them
    #[test]
    fn test_compile_never_fails(pattern in ".{0,48}") {
        let compiled = compile(&pattern);
        let any_error = compiled.items.iter().any(FormatItem::is_error);
        prop_assert_eq!(compiled.has_error, any_error);
    }
}
