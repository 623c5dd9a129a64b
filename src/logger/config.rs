/// Global logger configuration, initialized once from command-line flags.
use super::tags::LogTag;
use super::LogLevel;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::env;
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    /// Tags with debug output force-enabled via `--debug-<module>`.
    pub debug_tags: HashSet<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
        }
    }
}

impl LoggerConfig {
    pub fn is_debug_enabled(&self, tag: &LogTag) -> bool {
        self.debug_tags.contains(&tag.to_debug_key())
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_default()
}

pub fn set_min_level(level: LogLevel) {
    if let Ok(mut config) = LOGGER_CONFIG.write() {
        config.min_level = level;
    }
}

/// Scan command-line arguments for logging flags:
/// `--verbose`, `--quiet` and `--debug-<module>`.
pub fn init_from_args() {
    let mut config = LoggerConfig::default();

    for arg in env::args() {
        if arg == "--verbose" {
            config.min_level = LogLevel::Verbose;
        } else if arg == "--quiet" {
            config.min_level = LogLevel::Warning;
        } else if let Some(module) = arg.strip_prefix("--debug-") {
            config.debug_tags.insert(module.to_string());
        }
    }

    if let Ok(mut global) = LOGGER_CONFIG.write() {
        *global = config;
    }
}
