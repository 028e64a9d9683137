//! File appender implementation
//!
//! The target file is opened in append mode and reopened whenever the UTC
//! day changes or the previous open failed, giving daily rollover for
//! external tools that rotate by renaming.

use crate::core::timestamp::{utc_day, Clock, SystemClock};
use crate::core::{Appender, AppenderConfig, AppenderSettings, LogLevel, LoggerError, Result};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

struct FileState {
    writer: Option<BufWriter<File>>,
    /// UTC day of the last (re)open attempt
    last_open_day: Option<i64>,
    /// Suppresses repeated diagnostics while the target stays unavailable
    open_failed: bool,
}

pub struct FileAppender {
    path: PathBuf,
    settings: AppenderSettings,
    clock: Arc<dyn Clock>,
    auto_flush: bool,
    state: Mutex<FileState>,
}

impl FileAppender {
    /// Create an appender for `path` and try to open it.
    ///
    /// A failed open is not an error here: records are dropped until a
    /// later reopen succeeds.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let appender = Self::unopened(path.into(), Arc::new(SystemClock));
        appender.reopen();
        appender
    }

    /// Create an appender for `path`, failing if it cannot be opened now.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pattern_logger::appenders::FileAppender;
    ///
    /// let appender = FileAppender::open("/var/log/app.log").unwrap();
    /// ```
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let appender = Self::unopened(path.into(), Arc::new(SystemClock));
        {
            let mut state = appender.state.lock();
            let now = appender.clock.now();
            let file = open_append(&appender.path)?;
            state.writer = Some(BufWriter::new(file));
            state.last_open_day = Some(utc_day(now));
        }
        Ok(appender)
    }

    fn unopened(path: PathBuf, clock: Arc<dyn Clock>) -> Self {
        Self {
            path,
            settings: AppenderSettings::new(),
            clock,
            auto_flush: true,
            state: Mutex::new(FileState {
                writer: None,
                last_open_day: None,
                open_failed: false,
            }),
        }
    }

    /// Use `clock` for the day-rollover check.
    ///
    /// The file is reopened on the next write if the new clock reports a
    /// different day.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Flush after every record (the default) or only on
    /// [`Appender::flush`], reopen and drop.
    #[must_use]
    pub fn with_auto_flush(mut self, enabled: bool) -> Self {
        self.auto_flush = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// UTC day number of the last (re)open attempt.
    pub fn last_open_day(&self) -> Option<i64> {
        self.state.lock().last_open_day
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().writer.is_some()
    }

    /// Close and reopen the target file in append mode.
    ///
    /// Returns `false` if the file could not be opened.
    pub fn reopen(&self) -> bool {
        let mut state = self.state.lock();
        let now = self.clock.now();
        self.reopen_locked(&mut state, now)
    }

    fn reopen_locked(&self, state: &mut FileState, now: i64) -> bool {
        if let Some(mut writer) = state.writer.take() {
            // Best effort: the old handle is going away either way
            let _ = writer.flush();
        }
        state.last_open_day = Some(utc_day(now));

        match open_append(&self.path) {
            Ok(file) => {
                state.writer = Some(BufWriter::new(file));
                state.open_failed = false;
                true
            }
            Err(e) => {
                if !state.open_failed {
                    eprintln!("[LOGGER WARNING] {}. Records are dropped until it opens.", e);
                }
                state.open_failed = true;
                false
            }
        }
    }
}

fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e)))
}

impl Appender for FileAppender {
    fn settings(&self) -> &AppenderSettings {
        &self.settings
    }

    fn write_record(&self, _level: LogLevel, record: &str) -> Result<()> {
        // Day check, reopen and write form one unit per record
        let mut state = self.state.lock();
        let now = self.clock.now();
        if state.writer.is_none() || state.last_open_day != Some(utc_day(now)) {
            self.reopen_locked(&mut state, now);
        }

        let Some(writer) = state.writer.as_mut() else {
            return Ok(());
        };

        writer
            .write_all(record.as_bytes())
            .and_then(|()| if self.auto_flush { writer.flush() } else { Ok(()) })
            .map_err(|e| {
                LoggerError::file_appender(
                    self.path.display().to_string(),
                    format!("Failed to write log record: {}", e),
                )
            })
    }

    fn flush(&self) -> Result<()> {
        if let Some(writer) = self.state.lock().writer.as_mut() {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }

    fn to_config(&self) -> AppenderConfig {
        AppenderConfig::File {
            path: self.path.clone(),
            level: self.level().as_filter(),
            pattern: self.own_pattern(),
        }
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        if let Some(mut writer) = self.state.get_mut().writer.take() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};
    use tempfile::tempdir;

    const DAY: i64 = 86_400;

    struct ManualClock(AtomicI64);

    impl Clock for ManualClock {
        fn now(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_new_opens_and_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("app.log");

        let appender = FileAppender::new(&path);
        assert!(appender.is_open());
        assert!(path.exists());
        assert_eq!(appender.path(), path);
    }

    #[test]
    fn test_open_fails_for_directory_target() {
        let dir = tempdir().unwrap();
        assert!(FileAppender::open(dir.path()).is_err());

        let appender = FileAppender::new(dir.path());
        assert!(!appender.is_open());
        assert!(!appender.reopen());
        // Dropped silently
        assert!(appender.write_record(LogLevel::Info, "nowhere\n").is_ok());
    }

    #[test]
    fn test_appends_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "existing\n").unwrap();

        let appender = FileAppender::new(&path);
        appender.write_record(LogLevel::Info, "one\n").unwrap();
        appender.write_record(LogLevel::Info, "two\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "existing\none\ntwo\n");
    }

    #[test]
    fn test_reopens_on_day_change() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("daily.log");
        let clock = Arc::new(ManualClock(AtomicI64::new(10 * DAY + 100)));

        let appender = FileAppender::new(&path).with_clock(clock.clone());
        appender.write_record(LogLevel::Info, "day ten\n").unwrap();
        assert_eq!(appender.last_open_day(), Some(10));

        // Rotate externally; same-day writes keep using the old handle
        let rotated = dir.path().join("daily.log.1");
        fs::rename(&path, &rotated).unwrap();
        appender.write_record(LogLevel::Info, "still day ten\n").unwrap();
        assert!(!path.exists());

        clock.0.store(11 * DAY + 5, Ordering::SeqCst);
        appender.write_record(LogLevel::Info, "day eleven\n").unwrap();

        assert_eq!(appender.last_open_day(), Some(11));
        assert_eq!(
            fs::read_to_string(&rotated).unwrap(),
            "day ten\nstill day ten\n"
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "day eleven\n");
    }

    #[test]
    fn test_buffered_until_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("buffered.log");

        let appender = FileAppender::new(&path).with_auto_flush(false);
        appender.write_record(LogLevel::Info, "pending\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        appender.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "pending\n");
    }

    #[test]
    fn test_to_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.log");
        let appender = FileAppender::new(&path);

        assert_eq!(
            appender.to_config(),
            AppenderConfig::File {
                path,
                level: Some(LogLevel::Debug),
                pattern: None,
            }
        );
    }
}
