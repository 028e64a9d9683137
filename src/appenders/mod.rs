//! Appender implementations

pub mod console;
pub mod file;

pub use console::ConsoleAppender;
pub use file::FileAppender;

// Re-export the trait so appender authors need one import
pub use crate::core::{Appender, AppenderSettings};
