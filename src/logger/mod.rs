//! Tag-based structured logging for the swap core.
//!
//! Provides level-specific functions gated by a global configuration:
//! errors always print, info/warning print by default, and debug output is
//! enabled per module with `--debug-<module>` command-line flags
//! (e.g. `--debug-wallet`, `--debug-quote`), or everything with `--verbose`.
//!
//! Call `logger::init()` once at startup before any logging occurs.

mod config;
mod format;
mod tags;

pub use config::{get_logger_config, set_min_level, LoggerConfig};
pub use tags::LogTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
    Verbose = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Verbose => "VERBOSE",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Initialize the logger from command-line arguments. Safe to call more
/// than once; later calls re-read the flags.
pub fn init() {
    config::init_from_args();
}

/// Critical failures, always shown.
pub fn error(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Error, message);
}

/// Important issues that need attention.
pub fn warning(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Warning, message);
}

/// Standard operational events.
pub fn info(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Info, message);
}

/// Detailed diagnostics, shown only with `--debug-<module>`.
pub fn debug(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Debug, message);
}

/// Very detailed tracing, shown only with `--verbose`.
pub fn verbose(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Verbose, message);
}

fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    let config = get_logger_config();

    // Errors always log.
    if level == LogLevel::Error {
        return true;
    }

    if level > config.min_level {
        // Debug for a specific tag can still be force-enabled.
        if level == LogLevel::Debug {
            return config.is_debug_enabled(tag);
        }
        return false;
    }

    true
}

fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }
    format::format_and_log(tag, level, message);
}
