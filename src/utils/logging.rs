use std::env;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use once_cell::sync::Lazy;
use thiserror::Error;
use crate::types::constants::DEFAULT_LOG_FILE;

static ENABLE_LOGGING: AtomicBool = AtomicBool::new(false);
static LOG_TO_FILE: AtomicBool = AtomicBool::new(false);
static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("{var} must be 'true' or 'false', got '{value}'")]
    InvalidSetting { var: &'static str, value: String },
    #[error("Failed to open log file {path}: {source}")]
    LogFile { path: String, source: std::io::Error },
}

/// Initializes logging from environment variables:
/// - TANDEM_LOGGING: enables/disables logging (true/false, default false)
/// - TANDEM_LOG_TO_FILE: writes lines to a file instead of stdout (true/false, default false)
/// - TANDEM_LOG_FILE: path of that file (default `tandem.log`)
///
/// To see the event trace in tests, run: TANDEM_LOGGING=true cargo test -- --nocapture
pub fn init_logging() -> Result<(), LoggingError> {
    let enabled = read_flag("TANDEM_LOGGING")?;
    ENABLE_LOGGING.store(enabled, Ordering::SeqCst);
    if !enabled {
        return Ok(());
    }

    if read_flag("TANDEM_LOG_TO_FILE")? {
        let path = env::var("TANDEM_LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LoggingError::LogFile { path: path.clone(), source })?;
        if let Ok(mut slot) = LOG_FILE.lock() {
            *slot = Some(file);
        }
        LOG_TO_FILE.store(true, Ordering::SeqCst);
    }
    Ok(())
}

/// Returns true when `log` will emit anything
pub fn is_enabled() -> bool {
    ENABLE_LOGGING.load(Ordering::SeqCst)
}

pub fn log(prefix: &str, message: &str) {
    if !is_enabled() {
        return;
    }
    let line = format!("  [{}]   {}\n", prefix, message);

    if LOG_TO_FILE.load(Ordering::SeqCst) {
        if let Ok(mut slot) = LOG_FILE.lock() {
            if let Some(file) = slot.as_mut() {
                if let Err(e) = file.write_all(line.as_bytes()).and_then(|_| file.flush()) {
                    eprintln!("Failed to write to log file: {}", e);
                }
            }
        }
    } else {
        print!("{}", line);
    }
}

fn read_flag(var: &'static str) -> Result<bool, LoggingError> {
    match env::var(var) {
        Ok(value) => match value.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(LoggingError::InvalidSetting { var, value }),
        },
        Err(_) => Ok(false),
    }
}
