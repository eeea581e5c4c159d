/// Structured logging for the worker-safety monitoring service
///
/// Provides context-rich logging with a source tag, the worker badge the
/// message concerns (if any), timestamps and severity levels. Supports both
/// console output and file-based logging for unattended operation.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::model::FeedError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Feed,
    Engine,
    Cache,
    Replay,
    System,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Feed => write!(f, "FEED"),
            Source::Engine => write!(f, "ENGINE"),
            Source::Cache => write!(f, "CACHE"),
            Source::Replay => write!(f, "REPLAY"),
            Source::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the channel is simply quiet (no badge scanned yet)
    Expected,
    /// Unexpected failure - indicates network trouble or a bad key/channel
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    /// Single formatted line as written to the log file.
    fn format_entry(level: LogLevel, source: Source, worker_uid: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let worker_part = worker_uid.map(|u| format!(" [{}]", u)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, source, worker_part, message)
    }

    fn log(&self, level: LogLevel, source: Source, worker_uid: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, source, worker_uid, message);
        let worker_part = worker_uid.map(|u| format!(" [{}]", u)).unwrap_or_default();

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
                LogLevel::Info | LogLevel::Debug => println!("{}", log_entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, worker_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, worker_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn dispatch(level: LogLevel, source: Source, worker_uid: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, source, worker_uid, message);
        }
    }
}

/// Log a general informational message
pub fn info(source: Source, worker_uid: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, source, worker_uid, message);
}

/// Log a warning message
pub fn warn(source: Source, worker_uid: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, source, worker_uid, message);
}

/// Log an error message
pub fn error(source: Source, worker_uid: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, source, worker_uid, message);
}

/// Log a debug message
pub fn debug(source: Source, worker_uid: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, source, worker_uid, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// How worrying a failed fetch is.
///
/// An empty channel is normal right after a reset. A bad status or a
/// dropped connection means a wrong key/channel or an outage. A body that
/// will not parse could be either.
pub fn classify_feed_failure(err: &FeedError) -> FailureType {
    match err {
        FeedError::NoFeeds => FailureType::Expected,
        FeedError::HttpError(_) | FeedError::Transport(_) => FailureType::Unexpected,
        FeedError::ParseError(_) => FailureType::Unknown,
    }
}

/// Log a feed failure at the level its classification calls for
pub fn log_feed_failure(operation: &str, err: &FeedError) {
    let failure_type = classify_feed_failure(err);
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => debug(Source::Feed, None, &message),
        FailureType::Unexpected => error(Source::Feed, None, &message),
        FailureType::Unknown => warn(Source::Feed, None, &message),
    }
}

// ---------------------------------------------------------------------------
// Session Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a bounded monitoring run
pub fn log_session_summary(total: u64, live: u64, fallback: u64) {
    let message = format!(
        "Monitoring finished: {}/{} polls live, {} served from fallback",
        live, total, fallback
    );

    if fallback == 0 {
        info(Source::System, None, &message);
    } else if live == 0 {
        error(Source::System, None, &message);
    } else {
        warn(Source::System, None, &message);
    }
}
