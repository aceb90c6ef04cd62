//! Structured, tagged logging for walletwatch
//!
//! ```rust,ignore
//! use walletwatch::logger::{self, LogTag};
//!
//! logger::info(LogTag::Registry, "Wallet w1 added");
//! logger::debug(LogTag::Channel, "Event received"); // only with --debug-channel
//! ```
//!
//! Call `logger::init()` once at startup. It reads `--debug-<tag>`,
//! `--verbose` and `--quiet` from the command line and routes records of
//! third-party crates using the `log` facade through the same output.

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, set_logger_config, LoggerConfig};
pub use file::init_file_logging;
pub use levels::LogLevel;
pub use tags::LogTag;

/// Configure filtering from command-line flags and install the `log` bridge
pub fn init() {
    config::init_from_args();

    // Only the first call installs the bridge
    if log::set_logger(&FACADE_BRIDGE).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}

pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Shown only with `--debug-<tag>` for this tag
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Shown only with `--verbose`
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

pub fn flush() {
    file::flush_file_logging();
}

/// Forwards `log` records from dependencies (teloxide, reqwest, tungstenite)
struct FacadeBridge;

static FACADE_BRIDGE: FacadeBridge = FacadeBridge;

impl log::Log for FacadeBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        let level = LogLevel::from_log_level(metadata.level());
        core::should_log_with(&get_logger_config(), &LogTag::External, level)
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = LogLevel::from_log_level(record.level());
        let message = format!("{}: {}", record.target(), record.args());
        format::format_and_log(LogTag::External, level, &message);
    }

    fn flush(&self) {
        file::flush_file_logging();
    }
}
