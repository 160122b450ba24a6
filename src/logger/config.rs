/// Logger configuration and command-line flag parsing
///
/// The configuration is stored in a global RwLock so it can be inspected or
/// replaced at runtime (tests replace it to silence output).

use std::collections::HashSet;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use super::levels::LogLevel;
use super::tags::LogTag;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Minimum level threshold; messages above it are dropped
    pub min_level: LogLevel,
    /// Tags with --debug-<key> enabled
    pub debug_tags: HashSet<String>,
    /// Tags with --verbose-<key> enabled
    pub verbose_tags: HashSet<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Initialize configuration by scanning command-line arguments
///
/// Recognized flags:
/// - `--quiet`            only errors and warnings
/// - `--verbose`          everything, all tags
/// - `--debug-all`        debug level for every tag
/// - `--debug-<key>`      debug level for one tag (e.g. --debug-api)
/// - `--verbose-<key>`    verbose level for one tag
pub fn init_from_args() {
    let mut config = LoggerConfig::default();

    for arg in std::env::args() {
        match arg.as_str() {
            "--quiet" => config.min_level = LogLevel::Warning,
            "--verbose" => config.min_level = LogLevel::Verbose,
            "--debug-all" => {
                config.min_level = config.min_level.max(LogLevel::Debug);
                for tag in LogTag::all() {
                    config.debug_tags.insert(tag.to_debug_key());
                }
            }
            other => {
                if let Some(key) = other.strip_prefix("--debug-") {
                    config.min_level = config.min_level.max(LogLevel::Debug);
                    config.debug_tags.insert(key.to_string());
                } else if let Some(key) = other.strip_prefix("--verbose-") {
                    config.min_level = config.min_level.max(LogLevel::Verbose);
                    config.verbose_tags.insert(key.to_string());
                }
            }
        }
    }

    set_logger_config(config);
}

pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG
        .read()
        .map(|guard| guard.clone())
        .unwrap_or_default()
}

pub fn set_logger_config(config: LoggerConfig) {
    if let Ok(mut guard) = LOGGER_CONFIG.write() {
        *guard = config;
    }
}

pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    let config = get_logger_config();
    config.debug_tags.contains(&tag.to_debug_key())
}

pub fn is_verbose_enabled_for_tag(tag: &LogTag) -> bool {
    let config = get_logger_config();
    config.verbose_tags.contains(&tag.to_debug_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_filters_debug() {
        let config = LoggerConfig::default();
        assert_eq!(config.min_level, LogLevel::Info);
        assert!(config.debug_tags.is_empty());
    }
}
