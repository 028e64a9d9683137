//! Basic logger usage example
//!
//! Demonstrates the registry's root logger, named child loggers, level
//! filtering and custom patterns on the console.
//!
//! Run with: cargo run --example basic_usage

use pattern_logger::prelude::*;
use pattern_logger::{debug, error, info, log_event, warn};

fn main() -> Result<()> {
    println!("=== Pattern Logger - Basic Usage Example ===\n");

    let registry = LoggerRegistry::new();

    // A child logger with no appenders writes through the root
    println!("1. Child logger falling back to root:");
    let app = registry.get_logger("app");
    debug!(app, "This is a debug message");
    info!(app, "This is an info message");
    warn!(app, "This is a warning message");
    error!(app, "This is an error message");

    println!("\n2. Raising the minimum level:");
    app.set_level(LogLevel::Warn);
    println!("   Minimum level set to WARN - debug and info won't show:");
    debug!(app, "Debug message (hidden)");
    info!(app, "Info message (hidden)");
    warn!(app, "Warning message (visible)");

    println!("\n3. A logger with its own pattern and colored console:");
    let http = Logger::builder("http")
        .pattern("%d{%H:%M:%S} [%p] %c: %m%n")
        .appender(ConsoleAppender::new().with_colors(true))
        .build()?;
    info!(http, "GET /index.html -> {}", 200);
    error!(http, "GET /missing -> {}", 404);

    println!("\n4. Stream-style events:");
    {
        let mut event = log_event!(http, LogLevel::Info);
        event.append("served ").append(3).append(" requests");
    }

    println!("\n5. Invalid patterns are rejected:");
    if let Err(e) = http.set_pattern("%Q %m") {
        println!("   {}", e);
    }

    println!("\n6. Configuration snapshot:");
    let root = registry.root();
    let config = root.to_config();
    println!("   root: level={:?} appenders={}", config.level, config.appenders.len());
    println!("   loggers: {:?}", registry.loggers());

    registry.flush_all()?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
