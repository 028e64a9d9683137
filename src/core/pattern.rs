//! Pattern compiler
//!
//! Turns a printf-like pattern such as
//! `%d{%Y-%m-%d %H:%M:%S}%T[%p]%T%m%n` into an ordered list of
//! [`FormatItem`]s in a single left-to-right pass.
//!
//! | key | renders |
//! |-----|---------|
//! | `m` | message |
//! | `p` | level name |
//! | `r` | elapsed milliseconds |
//! | `c` | logger name |
//! | `t` | thread id |
//! | `n` | newline |
//! | `d` | timestamp, `%d{<strftime>}` |
//! | `f` | file name |
//! | `l` | line number |
//! | `T` | tab |
//! | `F` | fiber id |
//! | `N` | thread name |
//!
//! `%%` is a literal `%`. Compilation never fails: problems become inline
//! error items and set [`CompiledPattern::has_error`].

use super::format_item::FormatItem;
use std::fmt;

/// A directive that could not be compiled.
///
/// `Display` yields the marker text rendered in place of the directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Key not in the directive table (possibly empty)
    UnknownDirective(String),
    /// `{` with no closing `}` before the end of the pattern
    UnterminatedArgument,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::UnknownDirective(key) => write!(f, "<<error_format %{}>>", key),
            PatternError::UnterminatedArgument => f.write_str("<<pattern_error>>"),
        }
    }
}

impl std::error::Error for PatternError {}

/// Output of [`compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    pub items: Vec<FormatItem>,
    pub has_error: bool,
}

impl CompiledPattern {
    /// Errors embedded in the item list, in source order.
    pub fn errors(&self) -> Vec<PatternError> {
        collect_errors(&self.items)
    }
}

pub(crate) fn collect_errors(items: &[FormatItem]) -> Vec<PatternError> {
    items
        .iter()
        .filter_map(|item| match item {
            FormatItem::Error(error) => Some(error.clone()),
            _ => None,
        })
        .collect()
}

/// Compile `pattern` into format items.
pub fn compile(pattern: &str) -> CompiledPattern {
    let bytes = pattern.as_bytes();
    let len = bytes.len();
    let mut items = Vec::new();
    let mut literal = String::new();
    let mut has_error = false;
    let mut i = 0;

    while i < len {
        if bytes[i] != b'%' {
            // '%' is ASCII, so every split point is a char boundary
            let end = pattern[i..].find('%').map_or(len, |offset| i + offset);
            literal.push_str(&pattern[i..end]);
            i = end;
            continue;
        }

        if i + 1 < len && bytes[i + 1] == b'%' {
            literal.push('%');
            i += 2;
            continue;
        }

        let key_start = i + 1;
        let mut n = key_start;
        while n < len && bytes[n].is_ascii_alphabetic() {
            n += 1;
        }
        let key = &pattern[key_start..n];

        flush_literal(&mut literal, &mut items);

        let argument = if n < len && bytes[n] == b'{' {
            match pattern[n + 1..].find('}') {
                Some(offset) => {
                    let close = n + 1 + offset;
                    i = close + 1;
                    &pattern[n + 1..close]
                }
                None => {
                    items.push(FormatItem::Error(PatternError::UnterminatedArgument));
                    has_error = true;
                    i = len;
                    continue;
                }
            }
        } else {
            i = n;
            ""
        };

        match FormatItem::from_directive(key, argument) {
            Some(item) => items.push(item),
            None => {
                items.push(FormatItem::Error(PatternError::UnknownDirective(
                    key.to_string(),
                )));
                has_error = true;
            }
        }
    }

    flush_literal(&mut literal, &mut items);

    CompiledPattern { items, has_error }
}

fn flush_literal(literal: &mut String, items: &mut Vec<FormatItem>) {
    if !literal.is_empty() {
        items.push(FormatItem::Literal(std::mem::take(literal)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timestamp::DEFAULT_DATE_FORMAT;

    fn lit(s: &str) -> FormatItem {
        FormatItem::Literal(s.to_string())
    }

    fn unknown(key: &str) -> FormatItem {
        FormatItem::Error(PatternError::UnknownDirective(key.to_string()))
    }

    #[test]
    fn test_empty_pattern() {
        let compiled = compile("");
        assert!(compiled.items.is_empty());
        assert!(!compiled.has_error);
    }

    #[test]
    fn test_literal_only() {
        let compiled = compile("plain text, no directives");
        assert_eq!(compiled.items, vec![lit("plain text, no directives")]);
        assert!(!compiled.has_error);
    }

    #[test]
    fn test_default_pattern() {
        let compiled = compile("%d{%Y-%m-%d %H:%M:%S}%T%t%T%N%T%F%T[%p]%T[%c]%T%f:%l%T%m%n");
        assert!(!compiled.has_error);
        assert_eq!(
            compiled.items,
            vec![
                FormatItem::DateTime(DEFAULT_DATE_FORMAT.to_string()),
                FormatItem::Tab,
                FormatItem::ThreadId,
                FormatItem::Tab,
                FormatItem::ThreadName,
                FormatItem::Tab,
                FormatItem::FiberId,
                FormatItem::Tab,
                lit("["),
                FormatItem::Level,
                lit("]"),
                FormatItem::Tab,
                lit("["),
                FormatItem::LoggerName,
                lit("]"),
                FormatItem::Tab,
                FormatItem::FileName,
                lit(":"),
                FormatItem::Line,
                FormatItem::Tab,
                FormatItem::Message,
                FormatItem::NewLine,
            ]
        );
    }

    #[test]
    fn test_percent_escape() {
        assert_eq!(compile("%%").items, vec![lit("%")]);
        assert_eq!(compile("100%%").items, vec![lit("100%")]);
        assert_eq!(
            compile("%%%m%%").items,
            vec![lit("%"), FormatItem::Message, lit("%")]
        );
        assert!(!compile("%%%%").has_error);
        assert_eq!(compile("%%%%").items, vec![lit("%%")]);
    }

    #[test]
    fn test_adjacent_directives() {
        let compiled = compile("%m%n");
        assert_eq!(compiled.items, vec![FormatItem::Message, FormatItem::NewLine]);
        let compiled = compile("%p%%%c");
        assert_eq!(
            compiled.items,
            vec![FormatItem::Level, lit("%"), FormatItem::LoggerName]
        );
    }

    #[test]
    fn test_unknown_directive() {
        let compiled = compile("%Q");
        assert!(compiled.has_error);
        assert_eq!(compiled.items, vec![unknown("Q")]);
        assert_eq!(compiled.errors(), vec![PatternError::UnknownDirective("Q".into())]);
    }

    #[test]
    fn test_multi_letter_key_is_unknown() {
        let compiled = compile("%mx");
        assert!(compiled.has_error);
        assert_eq!(compiled.items, vec![unknown("mx")]);
    }

    #[test]
    fn test_empty_key() {
        let compiled = compile("%{arg}");
        assert!(compiled.has_error);
        assert_eq!(compiled.items, vec![unknown("")]);

        let compiled = compile("50%");
        assert!(compiled.has_error);
        assert_eq!(compiled.items, vec![lit("50"), unknown("")]);

        let compiled = compile("%5d");
        assert_eq!(compiled.items, vec![unknown(""), lit("5d")]);
    }

    #[test]
    fn test_unterminated_argument() {
        let compiled = compile("%d{%Y");
        assert!(compiled.has_error);
        assert_eq!(
            compiled.items,
            vec![FormatItem::Error(PatternError::UnterminatedArgument)]
        );

        let compiled = compile("before %d{%Y");
        assert_eq!(
            compiled.items,
            vec![
                lit("before "),
                FormatItem::Error(PatternError::UnterminatedArgument)
            ]
        );
    }

    #[test]
    fn test_argument_is_not_nested() {
        let compiled = compile("%d{%H{x}y}");
        assert_eq!(
            compiled.items,
            vec![FormatItem::DateTime("%H{x".to_string()), lit("y}")]
        );
    }

    #[test]
    fn test_empty_date_argument_uses_default() {
        let compiled = compile("%d{}");
        assert!(!compiled.has_error);
        assert_eq!(
            compiled.items,
            vec![FormatItem::DateTime(DEFAULT_DATE_FORMAT.to_string())]
        );
        assert_eq!(compile("%d").items, compiled.items);
    }

    #[test]
    fn test_argument_ignored_by_other_directives() {
        let compiled = compile("%m{ignored}!");
        assert!(!compiled.has_error);
        assert_eq!(compiled.items, vec![FormatItem::Message, lit("!")]);
    }

    #[test]
    fn test_stray_close_brace_is_literal() {
        let compiled = compile("%m}");
        assert_eq!(compiled.items, vec![FormatItem::Message, lit("}")]);
    }

    #[test]
    fn test_source_order_with_errors() {
        let compiled = compile("a%Q b%m c");
        assert_eq!(
            compiled.items,
            vec![
                lit("a"),
                unknown("Q"),
                lit(" b"),
                FormatItem::Message,
                lit(" c"),
            ]
        );
    }

    #[test]
    fn test_non_ascii_literals() {
        let compiled = compile("日志 %m ✓");
        assert_eq!(
            compiled.items,
            vec![lit("日志 "), FormatItem::Message, lit(" ✓")]
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            PatternError::UnknownDirective("X".into()).to_string(),
            "<<error_format %X>>"
        );
        assert_eq!(PatternError::UnterminatedArgument.to_string(), "<<pattern_error>>");
    }
}
