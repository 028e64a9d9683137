//! File logging example
//!
//! Demonstrates a file appender alongside the console, per-appender levels
//! and patterns, and configuring a logger from JSON.
//!
//! Run with: cargo run --example file_logging

use pattern_logger::prelude::*;
use pattern_logger::{error, info, warn};
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Pattern Logger - File Logging Example ===\n");

    let dir = std::env::temp_dir().join("pattern_logger_demo");
    let log_path = dir.join("app.log");
    let error_path = dir.join("errors.log");

    // Everything goes to app.log with the logger's pattern,
    // errors also go to errors.log with a shorter one
    let errors = Arc::new(FileAppender::new(&error_path));
    errors.set_level(LogLevel::Error);
    errors.set_formatter(Some(Arc::new(LogFormatter::parse("%d [%c] %m%n")?)));

    let logger = Logger::builder("orders")
        .pattern("%d{%Y-%m-%d %H:%M:%S}%T%p%T%c%T%t%T%m%n")
        .appender(FileAppender::new(&log_path))
        .shared_appender(errors)
        .build()?;

    for id in 1..=5 {
        info!(logger, "order {} accepted", id);
    }
    warn!(logger, "inventory low for sku {}", "A-113");
    error!(logger, "payment declined for order {}", 4);
    logger.flush()?;

    println!("Wrote {}", log_path.display());
    println!("Wrote {}", error_path.display());

    // The same kind of setup, described as data
    let registry = LoggerRegistry::new();
    let json = format!(
        r#"{{"name":"audit","level":"INFO","pattern":"%p %m%n",
            "appenders":[{{"type":"file","path":{:?}}},{{"type":"console"}}]}}"#,
        dir.join("audit.log").display().to_string()
    );
    let config: LoggerConfig = serde_json::from_str(&json)
        .map_err(|e| LoggerError::config("audit", e.to_string()))?;
    let audit = registry.apply(&config)?;
    info!(audit, "configured from JSON");

    let snapshot = serde_json::to_string_pretty(&registry.to_config())
        .map_err(|e| LoggerError::config("registry snapshot", e.to_string()))?;
    println!("\nRegistry configuration:\n{}", snapshot);

    registry.flush_all()?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
