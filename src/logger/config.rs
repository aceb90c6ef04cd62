//! Logger configuration derived from command-line flags

use super::levels::LogLevel;
use super::tags::LogTag;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Lowest-severity level that may be printed
    pub min_level: LogLevel,
    /// Tags with `--debug-<tag>` enabled
    pub debug_tags: HashSet<LogTag>,
    /// `--debug-all`
    pub debug_all: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            debug_all: false,
        }
    }
}

impl LoggerConfig {
    /// Build from raw arguments (`--verbose`, `--quiet`, `--debug-<tag>`)
    pub fn from_args(args: &[String]) -> Self {
        let mut config = LoggerConfig::default();

        for arg in args {
            match arg.as_str() {
                "--verbose" => config.min_level = LogLevel::Verbose,
                "--quiet" => config.min_level = LogLevel::Warning,
                "--debug-all" => config.debug_all = true,
                other => {
                    if let Some(tag) = other
                        .strip_prefix("--debug-")
                        .and_then(|key| LogTag::from_debug_key(&key.to_lowercase()))
                    {
                        config.debug_tags.insert(tag);
                    }
                }
            }
        }

        // Debug flags need the threshold lowered to reach debug lines
        if (config.debug_all || !config.debug_tags.is_empty())
            && config.min_level < LogLevel::Debug
        {
            config.min_level = LogLevel::Debug;
        }

        config
    }

    pub fn is_debug_enabled_for(&self, tag: &LogTag) -> bool {
        self.debug_all || self.min_level == LogLevel::Verbose || self.debug_tags.contains(tag)
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG
        .read()
        .map(|config| config.clone())
        .unwrap_or_default()
}

pub fn set_logger_config(config: LoggerConfig) {
    if let Ok(mut current) = LOGGER_CONFIG.write() {
        *current = config;
    }
}

pub fn init_from_args() {
    let args = crate::arguments::get_cmd_args();
    set_logger_config(LoggerConfig::from_args(&args));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_is_info() {
        let config = LoggerConfig::from_args(&args(&["walletwatch"]));
        assert_eq!(config.min_level, LogLevel::Info);
        assert!(!config.is_debug_enabled_for(&LogTag::Channel));
    }

    #[test]
    fn test_debug_flag_enables_single_tag() {
        let config = LoggerConfig::from_args(&args(&["walletwatch", "--debug-channel"]));
        assert_eq!(config.min_level, LogLevel::Debug);
        assert!(config.is_debug_enabled_for(&LogTag::Channel));
        assert!(!config.is_debug_enabled_for(&LogTag::Feed));
    }

    #[test]
    fn test_unknown_debug_flag_is_ignored() {
        let config = LoggerConfig::from_args(&args(&["walletwatch", "--debug-pools"]));
        assert_eq!(config.min_level, LogLevel::Info);
        assert!(config.debug_tags.is_empty());
    }

    #[test]
    fn test_quiet_and_verbose() {
        let quiet = LoggerConfig::from_args(&args(&["walletwatch", "--quiet"]));
        assert_eq!(quiet.min_level, LogLevel::Warning);

        let verbose = LoggerConfig::from_args(&args(&["walletwatch", "--verbose"]));
        assert_eq!(verbose.min_level, LogLevel::Verbose);
        assert!(verbose.is_debug_enabled_for(&LogTag::Resolver));
    }
}
