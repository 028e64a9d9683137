//! Log event structure

use super::log_level::LogLevel;
use super::logger::Logger;
use super::timestamp;
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

static NEXT_THREAD_ID: AtomicU32 = AtomicU32::new(1);

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: u32 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
    static THREAD_NAME_CACHE: RefCell<Option<Arc<str>>> = const { RefCell::new(None) };
}

/// Numeric id of the calling thread, stable for the thread's lifetime.
pub fn current_thread_id() -> u32 {
    THREAD_ID_CACHE.with(|id| *id)
}

/// Name of the calling thread, `<unnamed>` if it has none.
pub fn current_thread_name() -> Arc<str> {
    THREAD_NAME_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        cache
            .get_or_insert_with(|| Arc::from(std::thread::current().name().unwrap_or("<unnamed>")))
            .clone()
    })
}

/// One log occurrence.
///
/// Every field except the message buffer is fixed at construction. The
/// message is accumulated either through [`fmt::Write`] (stream style) or
/// through [`LogEvent::format`].
pub struct LogEvent {
    logger: Arc<Logger>,
    level: LogLevel,
    file: Cow<'static, str>,
    line: u32,
    elapse: u64,
    thread_id: u32,
    fiber_id: u32,
    time: i64,
    thread_name: Arc<str>,
    message: String,
}

impl LogEvent {
    /// Create an event stamped with the caller's thread identity, the
    /// current wall-clock time and the library's elapsed-ms counter.
    pub fn new(logger: Arc<Logger>, level: LogLevel) -> Self {
        Self {
            logger,
            level,
            file: Cow::Borrowed(""),
            line: 0,
            elapse: timestamp::elapsed_ms(),
            thread_id: current_thread_id(),
            fiber_id: 0,
            time: timestamp::unix_now(),
            thread_name: current_thread_name(),
            message: String::new(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        self.file = file.into();
        self.line = line;
        self
    }

    #[must_use]
    pub fn with_elapse(mut self, elapse: u64) -> Self {
        self.elapse = elapse;
        self
    }

    #[must_use]
    pub fn with_thread(mut self, thread_id: u32, thread_name: impl Into<Arc<str>>) -> Self {
        self.thread_id = thread_id;
        self.thread_name = thread_name.into();
        self
    }

    #[must_use]
    pub fn with_fiber_id(mut self, fiber_id: u32) -> Self {
        self.fiber_id = fiber_id;
        self
    }

    /// Override the wall-clock time (unix seconds).
    #[must_use]
    pub fn with_time(mut self, time: i64) -> Self {
        self.time = time;
        self
    }

    /// Logger that originated this event.
    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn elapse(&self) -> u64 {
        self.elapse
    }

    pub fn thread_id(&self) -> u32 {
        self.thread_id
    }

    pub fn fiber_id(&self) -> u32 {
        self.fiber_id
    }

    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    /// Message accumulated so far. Reading does not reset the buffer.
    pub fn content(&self) -> &str {
        &self.message
    }

    /// Append a displayable value to the message.
    ///
    /// A value whose `Display` impl fails leaves the message untouched.
    pub fn append(&mut self, value: impl fmt::Display) -> &mut Self {
        self.format(format_args!("{}", value))
    }

    /// Format `args` into the message.
    ///
    /// The arguments are rendered into a scratch buffer first; if any
    /// `Display` impl reports an error the message is left untouched.
    pub fn format(&mut self, args: fmt::Arguments<'_>) -> &mut Self {
        let mut rendered = String::new();
        if fmt::write(&mut rendered, args).is_ok() {
            self.message.push_str(&rendered);
        }
        self
    }
}

impl fmt::Write for LogEvent {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.message.push_str(s);
        Ok(())
    }
}

impl fmt::Debug for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogEvent")
            .field("logger", &self.logger.name())
            .field("level", &self.level)
            .field("file", &self.file)
            .field("line", &self.line)
            .field("elapse", &self.elapse)
            .field("thread_id", &self.thread_id)
            .field("fiber_id", &self.fiber_id)
            .field("time", &self.time)
            .field("thread_name", &self.thread_name)
            .field("message", &self.message)
            .finish()
    }
}

/// Owns a [`LogEvent`] and hands it to its logger when dropped.
///
/// Used by the `log_event!` macro for stream-style logging:
///
/// ```
/// use pattern_logger::{log_event, LogLevel, Logger};
/// use std::fmt::Write;
/// use std::sync::Arc;
///
/// let logger = Arc::new(Logger::new("app"));
/// write!(log_event!(logger, LogLevel::Info), "started in {} ms", 12).unwrap();
/// ```
pub struct LogEventGuard {
    event: Option<LogEvent>,
}

impl LogEventGuard {
    pub fn new(event: LogEvent) -> Self {
        Self { event: Some(event) }
    }

    /// Take the event back without dispatching it.
    pub fn into_inner(mut self) -> LogEvent {
        self.event.take().expect("event present until drop")
    }
}

impl Deref for LogEventGuard {
    type Target = LogEvent;

    fn deref(&self) -> &LogEvent {
        self.event.as_ref().expect("event present until drop")
    }
}

impl DerefMut for LogEventGuard {
    fn deref_mut(&mut self) -> &mut LogEvent {
        self.event.as_mut().expect("event present until drop")
    }
}

impl fmt::Write for LogEventGuard {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.deref_mut().write_str(s)
    }
}

impl Drop for LogEventGuard {
    fn drop(&mut self) {
        if let Some(event) = self.event.take() {
            let logger = Arc::clone(event.logger());
            logger.log(event.level(), &event);
        }
    }
}
