/// Filtering rules shared by every logging entry point
///
/// 1. Errors always pass
/// 2. Anything below the configured threshold is dropped
/// 3. Debug lines need `--debug-<tag>` (or `--debug-all`) for their tag
/// 4. Verbose lines need `--verbose`
use super::config::{get_logger_config, LoggerConfig};
use super::levels::LogLevel;
use super::tags::LogTag;

pub fn should_log_with(config: &LoggerConfig, tag: &LogTag, level: LogLevel) -> bool {
    if level == LogLevel::Error {
        return true;
    }

    if level > config.min_level {
        return false;
    }

    match level {
        LogLevel::Debug => config.is_debug_enabled_for(tag),
        LogLevel::Verbose => config.min_level == LogLevel::Verbose,
        _ => true,
    }
}

pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    let config = get_logger_config();
    if !should_log_with(&config, &tag, level) {
        return;
    }

    super::format::format_and_log(tag, level, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_always_pass() {
        let config = LoggerConfig {
            min_level: LogLevel::Warning,
            ..Default::default()
        };
        assert!(should_log_with(&config, &LogTag::Feed, LogLevel::Error));
        assert!(should_log_with(&config, &LogTag::Feed, LogLevel::Warning));
        assert!(!should_log_with(&config, &LogTag::Feed, LogLevel::Info));
    }

    #[test]
    fn test_debug_requires_tag_flag() {
        let mut config = LoggerConfig {
            min_level: LogLevel::Debug,
            ..Default::default()
        };
        config.debug_tags.insert(LogTag::Monitor);

        assert!(should_log_with(&config, &LogTag::Monitor, LogLevel::Debug));
        assert!(!should_log_with(&config, &LogTag::Channel, LogLevel::Debug));
        assert!(!should_log_with(&config, &LogTag::Monitor, LogLevel::Verbose));
    }
}
