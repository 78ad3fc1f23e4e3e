/// Structured logging for the flood-alert monitoring daemon.
///
/// Console logging with severity filtering, per-subsystem source tags,
/// and optional append-to-file output for long-running daemon sessions.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log levels and sources
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

/// Subsystem the log entry originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Remote record store client.
    Store,
    /// Severity classification and alert reporting.
    Alert,
    /// Poll loop and lifecycle.
    Daemon,
    /// Everything else (startup, config, endpoint).
    System,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Store => write!(f, "STORE"),
            Source::Alert => write!(f, "ALERT"),
            Source::Daemon => write!(f, "DAEMON"),
            Source::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    min_level: LogLevel,
    log_file: Option<String>,
}

impl Logger {
    fn log(&self, level: LogLevel, source: Source, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let entry = format!("{} {} [{}] {}", timestamp, level, source, message);

        match level {
            LogLevel::Error | LogLevel::Warning => eprintln!("{}", entry),
            _ => println!("{}", entry),
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

/// Initialize the global logger. Call once at startup; later calls replace
/// the previous configuration.
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>) {
    *LOGGER.lock().unwrap() = Some(Logger {
        min_level,
        log_file: log_file.map(String::from),
    });
}

pub fn info(source: Source, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, source, message);
    }
}

pub fn warn(source: Source, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, source, message);
    }
}

pub fn error(source: Source, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, source, message);
    }
}

pub fn debug(source: Source, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, source, message);
    }
}

// ---------------------------------------------------------------------------
// Failure classification
// ---------------------------------------------------------------------------

/// Whether a store failure indicates service degradation or a transient
/// condition that resolves on the next poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Transient: the store or network will likely recover by itself.
    Transient,
    /// Unexpected: schema drift, auth problems, or a bug on our side.
    Unexpected,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Transient => write!(f, "TRANSIENT"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
        }
    }
}

/// Classifies a store failure from its error message.
///
/// Parse errors and malformed rows point at schema drift between the store
/// and our wire types; HTTP 5xx and transport errors usually self-heal.
pub fn classify_store_failure(error_message: &str) -> FailureType {
    if error_message.contains("Parse error") || error_message.contains("Malformed reading") {
        FailureType::Unexpected
    } else if error_message.contains("HTTP error: 4") {
        // 4xx means our request or credentials are wrong, not the store.
        FailureType::Unexpected
    } else {
        FailureType::Transient
    }
}

/// Logs a store failure with automatic classification.
pub fn log_store_failure(operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_store_failure(&error_msg);
    let message = format!("{} failed [{}]: {}", operation, failure_type, error_msg);

    match failure_type {
        FailureType::Transient => warn(Source::Store, &message),
        FailureType::Unexpected => error(Source::Store, &message),
    }
}
