//! Logging configuration for the console toolkit.
//!
//! Interactive shells write logs to a file so log lines do not interleave
//! with the prompt; one-shot exec sessions log to stderr.

use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Builds the filter from `RUST_LOG`, falling back to the configured level.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initializes logging for interactive shell mode.
///
/// Location: `~/.local/state/ctk/ctk.log` on Linux (XDG state directory),
/// or the platform-appropriate state/config directory on other systems.
pub fn init_file_logging(default_level: &str) {
    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            return;
        }
    }

    // Truncate on each run to avoid unbounded growth
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {e}");
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(log_file)
        .with_ansi(false)
        .try_init();
}

/// Initializes logging for exec mode.
pub fn init_stderr_logging(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Returns the path for the log file.
///
/// Uses XDG state directory on Linux (`~/.local/state/ctk/ctk.log`),
/// or falls back to config directory on other platforms.
pub fn get_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("ctk").join("ctk.log");
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("ctk").join("ctk.log");
    }

    // Last resort: temp directory
    std::env::temp_dir().join("ctk.log")
}
