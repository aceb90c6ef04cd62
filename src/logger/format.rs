//! Console formatting (colored, aligned columns) and file mirroring

use super::file::write_to_file;
use super::levels::LogLevel;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stdout, ErrorKind, Write};

const TAG_WIDTH: usize = 10;
const LEVEL_WIDTH: usize = 7;

pub fn format_and_log(tag: LogTag, level: LogLevel, message: &str) {
    let now = Local::now();

    let console_line = format!(
        "{} [{}] [{}] {}",
        now.format("%H:%M:%S").to_string().dimmed(),
        format_tag(&tag),
        format_level(level),
        message
    );
    print_stdout_safe(&console_line);

    let file_line = format!(
        "{} [{}] [{}] {}",
        now.format("%Y-%m-%d %H:%M:%S"),
        tag.to_plain_string(),
        level.as_str(),
        message
    );
    write_to_file(&file_line);
}

fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Config => label.yellow(),
        LogTag::Registry => label.bright_magenta().bold(),
        LogTag::Monitor => label.bright_cyan().bold(),
        LogTag::Channel => label.cyan(),
        LogTag::Feed => label.bright_blue(),
        LogTag::Resolver => label.blue(),
        LogTag::Classifier => label.green(),
        LogTag::Notifier => label.bright_green().bold(),
        LogTag::External => label.white().dimmed(),
    }
}

fn format_level(level: LogLevel) -> ColoredString {
    let label = format!("{:<width$}", level.as_str(), width = LEVEL_WIDTH);
    match level {
        LogLevel::Error => label.bright_red().bold(),
        LogLevel::Warning => label.bright_yellow(),
        LogLevel::Info => label.normal(),
        LogLevel::Debug => label.bright_black(),
        LogLevel::Verbose => label.dimmed(),
    }
}

/// Print without panicking when stdout is a closed pipe (`walletwatch | head`)
fn print_stdout_safe(line: &str) {
    let mut out = stdout();
    if let Err(e) = writeln!(out, "{}", line) {
        if e.kind() != ErrorKind::BrokenPipe {
            eprintln!("{}", line);
        }
    }
}
