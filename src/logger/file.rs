//! Optional plain-text log file (no ANSI colors)

use once_cell::sync::Lazy;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

/// Open (append) the log file; an empty path disables file output
pub fn init_file_logging(path: &str) -> Result<(), String> {
    let file = if path.is_empty() {
        None
    } else {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create log directory: {}", e))?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| format!("Failed to open log file '{}': {}", path, e))?;
        Some(file)
    };

    if let Ok(mut slot) = LOG_FILE.lock() {
        *slot = file;
    }
    Ok(())
}

pub fn write_to_file(line: &str) {
    if let Ok(mut slot) = LOG_FILE.lock() {
        if let Some(file) = slot.as_mut() {
            // A full disk must not take the process down
            let _ = writeln!(file, "{}", line);
        }
    }
}

pub fn flush_file_logging() {
    if let Ok(mut slot) = LOG_FILE.lock() {
        if let Some(file) = slot.as_mut() {
            let _ = file.flush();
        }
    }
}
