//! Name to logger registry owning the root logger

use super::{
    appender::Appender,
    config::LoggerConfig,
    error::Result,
    formatter::LogFormatter,
    log_level::LogLevel,
    logger::Logger,
    timestamp,
};
use crate::appenders::ConsoleAppender;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Name of the logger every registry creates up front.
pub const ROOT_LOGGER_NAME: &str = "root";

/// Lazily populated map of named loggers.
///
/// The root logger is created with the registry and, by default, writes to
/// the console. Every logger obtained through [`LoggerRegistry::get_logger`]
/// falls back to it while it has no appenders of its own.
///
/// # Examples
///
/// ```
/// use pattern_logger::LoggerRegistry;
///
/// let registry = LoggerRegistry::new();
/// let db = registry.get_logger("db");
/// assert!(std::sync::Arc::ptr_eq(&db, &registry.get_logger("db")));
/// assert_eq!(db.root().unwrap().name(), "root");
/// ```
pub struct LoggerRegistry {
    root: Arc<Logger>,
    loggers: Mutex<BTreeMap<String, Arc<Logger>>>,
}

impl LoggerRegistry {
    /// Registry whose root logger has one console appender and the default
    /// pattern.
    pub fn new() -> Self {
        let root = Logger::new(ROOT_LOGGER_NAME);
        root.add_appender(Arc::new(ConsoleAppender::new()));
        Self::with_root(Arc::new(root))
    }

    fn with_root(root: Arc<Logger>) -> Self {
        // Start the elapsed-ms clock no later than the registry
        timestamp::elapsed_ms();

        let mut loggers = BTreeMap::new();
        loggers.insert(ROOT_LOGGER_NAME.to_string(), Arc::clone(&root));
        Self {
            root,
            loggers: Mutex::new(loggers),
        }
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn root(&self) -> Arc<Logger> {
        Arc::clone(&self.root)
    }

    /// Return the logger called `name`, creating it on first request.
    ///
    /// A new logger starts at DEBUG with the default pattern, no appenders,
    /// and the root logger as its fallback.
    pub fn get_logger(&self, name: &str) -> Arc<Logger> {
        let mut loggers = self.loggers.lock();
        if let Some(logger) = loggers.get(name) {
            return Arc::clone(logger);
        }

        let logger = Logger::new(name);
        logger.set_root(&self.root);
        let logger = Arc::new(logger);
        loggers.insert(name.to_string(), Arc::clone(&logger));
        logger
    }

    /// Names of every registered logger, sorted, including the root.
    pub fn loggers(&self) -> Vec<String> {
        self.loggers.lock().keys().cloned().collect()
    }

    /// Configure (creating if needed) the logger named by `config`.
    ///
    /// The whole configuration is checked before anything changes. A
    /// non-empty appender list replaces the logger's current appenders;
    /// an empty one leaves them alone.
    pub fn apply(&self, config: &LoggerConfig) -> Result<Arc<Logger>> {
        config.validate()?;

        let appenders = config
            .appenders
            .iter()
            .map(|a| a.build())
            .collect::<Result<Vec<Arc<dyn Appender>>>>()?;

        let logger = self.get_logger(&config.name);
        if let Some(level) = config.level {
            logger.set_level(level);
        }
        if let Some(pattern) = &config.pattern {
            logger.set_pattern(pattern)?;
        }
        if !appenders.is_empty() {
            logger.clear_appenders();
            for appender in appenders {
                logger.add_appender(appender);
            }
        }
        Ok(logger)
    }

    /// Snapshot of every registered logger, sorted by name.
    pub fn to_config(&self) -> Vec<LoggerConfig> {
        let loggers: Vec<Arc<Logger>> = self.loggers.lock().values().cloned().collect();
        loggers.iter().map(|l| l.to_config()).collect()
    }

    /// Flush every appender of every logger, reporting the first failure.
    pub fn flush_all(&self) -> Result<()> {
        let loggers: Vec<Arc<Logger>> = self.loggers.lock().values().cloned().collect();
        let mut first_error = None;
        for logger in loggers {
            if let Err(e) = logger.flush() {
                eprintln!("[LOGGER ERROR] Flush of logger '{}' failed: {}", logger.name(), e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("loggers", &self.loggers())
            .finish()
    }
}

/// Builder for a [`LoggerRegistry`] with a customized root logger.
///
/// # Example
/// ```
/// use pattern_logger::prelude::*;
///
/// let registry = LoggerRegistry::builder()
///     .root_level(LogLevel::Info)
///     .root_pattern("%p %c %m%n")
///     .build()
///     .unwrap();
/// assert_eq!(registry.root().level(), LogLevel::Info);
/// ```
pub struct RegistryBuilder {
    root_level: LogLevel,
    root_pattern: Option<String>,
    root_appenders: Vec<Arc<dyn Appender>>,
    default_appender: bool,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            root_level: LogLevel::Debug,
            root_pattern: None,
            root_appenders: Vec::new(),
            default_appender: true,
        }
    }

    #[must_use]
    pub fn root_level(mut self, level: LogLevel) -> Self {
        self.root_level = level;
        self
    }

    #[must_use]
    pub fn root_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.root_pattern = Some(pattern.into());
        self
    }

    /// Attach `appender` to the root instead of the default console
    /// appender. May be called more than once.
    #[must_use]
    pub fn root_appender(mut self, appender: Arc<dyn Appender>) -> Self {
        self.root_appenders.push(appender);
        self
    }

    /// Leave the root with no appenders unless some are given.
    #[must_use]
    pub fn without_default_appender(mut self) -> Self {
        self.default_appender = false;
        self
    }

    pub fn build(self) -> Result<LoggerRegistry> {
        let root = Logger::new(ROOT_LOGGER_NAME);
        root.set_level(self.root_level);
        if let Some(pattern) = &self.root_pattern {
            root.set_formatter(Arc::new(LogFormatter::parse(pattern.as_str())?));
        }

        if self.root_appenders.is_empty() {
            if self.default_appender {
                root.add_appender(Arc::new(ConsoleAppender::new()));
            }
        } else {
            for appender in self.root_appenders {
                root.add_appender(appender);
            }
        }

        Ok(LoggerRegistry::with_root(Arc::new(root)))
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
