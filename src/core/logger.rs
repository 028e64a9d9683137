//! Main logger implementation

use super::{
    appender::Appender,
    config::LoggerConfig,
    error::Result,
    formatter::LogFormatter,
    log_event::LogEvent,
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use parking_lot::RwLock;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

struct LoggerState {
    appenders: Vec<Arc<dyn Appender>>,
    formatter: Arc<LogFormatter>,
}

/// A named, leveled event router.
///
/// Events at or above the logger's level are handed to every attached
/// appender in insertion order. A logger with no appenders forwards to
/// its root logger, if one is set.
pub struct Logger {
    name: String,
    min_level: RwLock<LogLevel>,
    state: RwLock<LoggerState>,
    /// Non-owning link to the fallback logger
    root: RwLock<Option<Weak<Logger>>>,
    /// Metrics for observability (delivered, filtered, dropped, fallbacks)
    metrics: LoggerMetrics,
}

impl Logger {
    /// Create a logger at level DEBUG with the default pattern and no
    /// appenders.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: RwLock::new(LogLevel::Debug),
            state: RwLock::new(LoggerState {
                appenders: Vec::new(),
                formatter: Arc::new(LogFormatter::default()),
            }),
            root: RwLock::new(None),
            metrics: LoggerMetrics::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLevel {
        *self.min_level.read()
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    /// Whether an event at `level` passes this logger's threshold.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }

    /// Dispatch `event` at `level`.
    ///
    /// Below the logger's level the event is dropped. Otherwise every
    /// appender receives it; a failing or panicking appender does not stop
    /// the others. Without appenders the event goes to the root logger
    /// (one hop, never the root's root).
    pub fn log(&self, level: LogLevel, event: &LogEvent) {
        if !self.enabled(level) {
            self.metrics.record_filtered();
            return;
        }
        self.dispatch(level, event, true);
    }

    fn dispatch(&self, level: LogLevel, event: &LogEvent, allow_fallback: bool) {
        // Snapshot so appenders run without the list lock held
        let appenders = self.state.read().appenders.clone();
        if !appenders.is_empty() {
            self.fan_out(&appenders, level, event);
            return;
        }
        if !allow_fallback {
            return;
        }

        let root = self.root.read().as_ref().and_then(Weak::upgrade);
        if let Some(root) = root {
            if std::ptr::eq(Arc::as_ptr(&root), self) {
                return;
            }
            self.metrics.record_root_fallback();
            if !root.enabled(level) {
                root.metrics.record_filtered();
                return;
            }
            root.dispatch(level, event, false);
        }
    }

    /// Deliver to each appender with per-appender panic isolation
    fn fan_out(&self, appenders: &[Arc<dyn Appender>], level: LogLevel, event: &LogEvent) {
        for (idx, appender) in appenders.iter().enumerate() {
            let result = panic::catch_unwind(AssertUnwindSafe(|| appender.log(self, level, event)));

            match result {
                Ok(Ok(())) => {
                    self.metrics.record_logged();
                }
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Logger '{}' appender #{} ({}) failed: {}",
                        self.name,
                        idx,
                        appender.name(),
                        e
                    );
                    self.metrics.record_dropped();
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Logger '{}' appender #{} ({}) panicked: {}. \
                         Other appenders continue to function.",
                        self.name,
                        idx,
                        appender.name(),
                        panic_message(panic_info.as_ref())
                    );
                    self.metrics.record_dropped();
                }
            }
        }
    }

    #[inline]
    pub fn debug(&self, event: &LogEvent) {
        self.log(LogLevel::Debug, event);
    }

    #[inline]
    pub fn info(&self, event: &LogEvent) {
        self.log(LogLevel::Info, event);
    }

    #[inline]
    pub fn warn(&self, event: &LogEvent) {
        self.log(LogLevel::Warn, event);
    }

    #[inline]
    pub fn error(&self, event: &LogEvent) {
        self.log(LogLevel::Error, event);
    }

    #[inline]
    pub fn fatal(&self, event: &LogEvent) {
        self.log(LogLevel::Fatal, event);
    }

    /// Attach an appender.
    ///
    /// An appender without any formatter receives this logger's current
    /// default formatter.
    pub fn add_appender(&self, appender: Arc<dyn Appender>) {
        let mut state = self.state.write();
        appender.settings().fill_formatter(&state.formatter);
        state.appenders.push(appender);
    }

    /// Detach the first occurrence of `appender` (by identity).
    pub fn remove_appender(&self, appender: &Arc<dyn Appender>) -> bool {
        let mut state = self.state.write();
        match state
            .appenders
            .iter()
            .position(|existing| Arc::ptr_eq(existing, appender))
        {
            Some(idx) => {
                state.appenders.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear_appenders(&self) {
        self.state.write().appenders.clear();
    }

    /// Attached appenders in dispatch order.
    pub fn appenders(&self) -> Vec<Arc<dyn Appender>> {
        self.state.read().appenders.clone()
    }

    /// The logger's default formatter.
    pub fn formatter(&self) -> Arc<LogFormatter> {
        Arc::clone(&self.state.read().formatter)
    }

    /// Replace the default formatter and push it to every attached
    /// appender that has no formatter of its own.
    pub fn set_formatter(&self, formatter: Arc<LogFormatter>) {
        let mut state = self.state.write();
        for appender in &state.appenders {
            appender.settings().inherit_formatter(&formatter);
        }
        state.formatter = formatter;
    }

    /// Compile `pattern` and install it as the default formatter.
    ///
    /// A pattern with any compile error is rejected and the current
    /// formatter stays active.
    pub fn set_pattern(&self, pattern: &str) -> Result<()> {
        let formatter = LogFormatter::parse(pattern)?;
        self.set_formatter(Arc::new(formatter));
        Ok(())
    }

    /// Set the fallback logger used when no appender is attached.
    pub fn set_root(&self, root: &Arc<Logger>) {
        *self.root.write() = Some(Arc::downgrade(root));
    }

    pub fn clear_root(&self) {
        *self.root.write() = None;
    }

    /// The fallback logger, if set and still alive.
    pub fn root(&self) -> Option<Arc<Logger>> {
        self.root.read().as_ref().and_then(Weak::upgrade)
    }

    /// Get the logger metrics for detailed observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        for appender in self.appenders() {
            appender.flush()?;
        }
        Ok(())
    }

    /// Snapshot of this logger's configuration.
    pub fn to_config(&self) -> LoggerConfig {
        let state = self.state.read();
        LoggerConfig {
            name: self.name.clone(),
            level: self.level().as_filter(),
            pattern: Some(state.formatter.pattern().to_string()),
            appenders: state.appenders.iter().map(|a| a.to_config()).collect(),
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use pattern_logger::prelude::*;
    ///
    /// let logger = Logger::builder("app")
    ///     .level(LogLevel::Info)
    ///     .pattern("[%p] %c %m%n")
    ///     .appender(ConsoleAppender::new())
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(logger.name(), "app");
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("pattern", &state.formatter.pattern())
            .field("appenders", &state.appenders.len())
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        for appender in self.state.get_mut().appenders.iter() {
            if let Err(e) = appender.flush() {
                eprintln!(
                    "[LOGGER ERROR] Failed to flush appender '{}' of logger '{}': {}",
                    appender.name(),
                    self.name,
                    e
                );
            }
        }
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder for constructing a shared Logger with a fluent API
pub struct LoggerBuilder {
    name: String,
    level: LogLevel,
    pattern: Option<String>,
    formatter: Option<Arc<LogFormatter>>,
    appenders: Vec<Arc<dyn Appender>>,
    root: Option<Arc<Logger>>,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: LogLevel::Debug,
            pattern: None,
            formatter: None,
            appenders: Vec::new(),
            root: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Default pattern; validated by [`LoggerBuilder::build`].
    #[must_use = "builder methods return a new value"]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Default formatter. Takes precedence over [`LoggerBuilder::pattern`].
    #[must_use = "builder methods return a new value"]
    pub fn formatter(mut self, formatter: Arc<LogFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Arc::new(appender));
        self
    }

    /// Attach an appender that is also shared with other loggers.
    #[must_use = "builder methods return a new value"]
    pub fn shared_appender(mut self, appender: Arc<dyn Appender>) -> Self {
        self.appenders.push(appender);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn root(mut self, root: &Arc<Logger>) -> Self {
        self.root = Some(Arc::clone(root));
        self
    }

    /// Build the Logger, rejecting an invalid pattern.
    pub fn build(self) -> Result<Arc<Logger>> {
        let logger = Logger::new(self.name);
        logger.set_level(self.level);

        if let Some(formatter) = self.formatter {
            logger.set_formatter(formatter);
        } else if let Some(pattern) = self.pattern {
            logger.set_pattern(&pattern)?;
        }

        for appender in self.appenders {
            logger.add_appender(appender);
        }
        if let Some(root) = &self.root {
            logger.set_root(root);
        }

        Ok(Arc::new(logger))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::appender::AppenderSettings;
    use crate::core::error::LoggerError;
    use parking_lot::Mutex;

    struct Recording {
        settings: AppenderSettings,
        records: Mutex<Vec<String>>,
    }

    impl Recording {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                settings: AppenderSettings::new(),
                records: Mutex::new(Vec::new()),
            })
        }

        fn records(&self) -> Vec<String> {
            self.records.lock().clone()
        }
    }

    impl Appender for Recording {
        fn settings(&self) -> &AppenderSettings {
            &self.settings
        }

        fn write_record(&self, _level: LogLevel, record: &str) -> Result<()> {
            self.records.lock().push(record.to_string());
            Ok(())
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct Panicking {
        settings: AppenderSettings,
    }

    impl Appender for Panicking {
        fn settings(&self) -> &AppenderSettings {
            &self.settings
        }

        fn write_record(&self, _level: LogLevel, _record: &str) -> Result<()> {
            panic!("sink exploded");
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn message_event(logger: &Arc<Logger>, level: LogLevel, message: &str) -> LogEvent {
        let mut event = LogEvent::new(Arc::clone(logger), level);
        event.append(message);
        event
    }

    #[test]
    fn test_defaults() {
        let logger = Logger::new("svc");
        assert_eq!(logger.name(), "svc");
        assert_eq!(logger.level(), LogLevel::Debug);
        assert_eq!(
            logger.formatter().pattern(),
            crate::core::formatter::DEFAULT_PATTERN
        );
        assert!(logger.appenders().is_empty());
        assert!(logger.root().is_none());
    }

    #[test]
    fn test_level_filter() {
        let logger = Arc::new(Logger::new("svc"));
        logger.set_level(LogLevel::Warn);
        let sink = Recording::new();
        logger.add_appender(sink.clone());

        logger.info(&message_event(&logger, LogLevel::Info, "quiet"));
        logger.error(&message_event(&logger, LogLevel::Error, "loud"));

        assert_eq!(sink.records().len(), 1);
        assert_eq!(logger.metrics().filtered_count(), 1);
    }

    #[test]
    fn test_backfill_and_repush() {
        let logger = Arc::new(Logger::new("svc"));
        let inherited = Recording::new();
        let own = Recording::new();
        own.set_formatter(Some(Arc::new(LogFormatter::new("own:%m"))));

        logger.add_appender(inherited.clone());
        logger.add_appender(own.clone());
        assert!(!inherited.has_formatter());
        assert_eq!(
            inherited.formatter().unwrap().pattern(),
            crate::core::formatter::DEFAULT_PATTERN
        );

        logger.set_pattern("new:%m").unwrap();
        logger.log(LogLevel::Info, &message_event(&logger, LogLevel::Info, "x"));

        assert_eq!(inherited.records(), vec!["new:x"]);
        assert_eq!(own.records(), vec!["own:x"]);
    }

    #[test]
    fn test_invalid_pattern_keeps_previous_formatter() {
        let logger = Logger::new("svc");
        logger.set_pattern("%m").unwrap();

        let err = logger.set_pattern("%m %Q").unwrap_err();
        assert!(matches!(err, LoggerError::InvalidPattern { .. }));
        assert_eq!(logger.formatter().pattern(), "%m");
    }

    #[test]
    fn test_remove_and_clear_appenders() {
        let logger = Logger::new("svc");
        let a: Arc<dyn Appender> = Recording::new();
        let b: Arc<dyn Appender> = Recording::new();
        logger.add_appender(a.clone());
        logger.add_appender(b.clone());

        assert!(logger.remove_appender(&a));
        assert!(!logger.remove_appender(&a));
        assert_eq!(logger.appenders().len(), 1);
        assert!(Arc::ptr_eq(&logger.appenders()[0], &b));

        logger.clear_appenders();
        assert!(logger.appenders().is_empty());
    }

    #[test]
    fn test_panicking_appender_is_isolated() {
        let logger = Arc::new(Logger::new("svc"));
        logger.set_pattern("%m").unwrap();
        logger.add_appender(Arc::new(Panicking {
            settings: AppenderSettings::new(),
        }));
        let sink = Recording::new();
        logger.add_appender(sink.clone());

        logger.warn(&message_event(&logger, LogLevel::Warn, "survives"));

        assert_eq!(sink.records(), vec!["survives"]);
        assert_eq!(logger.metrics().dropped_count(), 1);
        assert_eq!(logger.metrics().total_logged(), 1);
    }

    #[test]
    fn test_root_fallback_is_single_hop() {
        let top = Arc::new(Logger::new("top"));
        let root = Arc::new(Logger::new("root"));
        root.set_root(&top);
        let top_sink = Recording::new();
        top.add_appender(top_sink.clone());

        let child = Arc::new(Logger::new("child"));
        child.set_root(&root);

        // root has no appenders; its own root must not be consulted
        child.info(&message_event(&child, LogLevel::Info, "lost"));

        assert_eq!(child.metrics().root_fallbacks(), 1);
        assert!(top_sink.records().is_empty());
    }

    #[test]
    fn test_root_reference_is_weak() {
        let child = Logger::new("child");
        {
            let root = Arc::new(Logger::new("root"));
            child.set_root(&root);
            assert!(child.root().is_some());
        }
        assert!(child.root().is_none());
    }

    #[test]
    fn test_builder() {
        let root = Arc::new(Logger::new("root"));
        let sink = Recording::new();
        let logger = Logger::builder("svc")
            .level(LogLevel::Info)
            .pattern("%c:%m")
            .shared_appender(sink.clone())
            .root(&root)
            .build()
            .unwrap();

        assert_eq!(logger.level(), LogLevel::Info);
        assert!(logger.root().is_some());
        logger.info(&message_event(&logger, LogLevel::Info, "built"));
        assert_eq!(sink.records(), vec!["svc:built"]);
    }

    #[test]
    fn test_builder_rejects_invalid_pattern() {
        let result = Logger::builder("svc").pattern("%d{").build();
        assert!(matches!(result, Err(LoggerError::InvalidPattern { .. })));
    }

    #[test]
    fn test_to_config() {
        let logger = Logger::new("svc");
        logger.set_level(LogLevel::Error);
        logger.set_pattern("%m%n").unwrap();
        logger.add_appender(Recording::new());

        let config = logger.to_config();
        assert_eq!(config.name, "svc");
        assert_eq!(config.level, Some(LogLevel::Error));
        assert_eq!(config.pattern.as_deref(), Some("%m%n"));
        assert_eq!(config.appenders.len(), 1);
    }
}
