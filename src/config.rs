//! Configuration management for the console toolkit.
//!
//! Handles loading configuration from a TOML file. Every field has a default,
//! so a missing file or a partial file is valid.

use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default tracing filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Interactive shell settings.
    #[serde(default)]
    pub shell: ShellConfig,

    /// Activity lifecycle settings.
    #[serde(default)]
    pub activity: ActivityConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            shell: ShellConfig::default(),
            activity: ActivityConfig::default(),
        }
    }
}

/// Interactive shell settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Greeting printed before the first prompt. Empty disables it.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Prompt shown when the input buffer is empty.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Prompt shown while a multi-line command is being accumulated.
    #[serde(default = "default_continuation_prompt")]
    pub continuation_prompt: String,

    /// Translate `\n` to `\r\n` on terminal output.
    #[serde(default)]
    pub crlf: bool,
}

fn default_greeting() -> String {
    format!("Welcome to ctk {}", env!("CARGO_PKG_VERSION"))
}

fn default_prompt() -> String {
    "ctk> ".to_string()
}

fn default_continuation_prompt() -> String {
    "...> ".to_string()
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            prompt: default_prompt(),
            continuation_prompt: default_continuation_prompt(),
            crlf: false,
        }
    }
}

impl ShellConfig {
    /// Returns the greeting, or `None` when it is disabled.
    pub fn greeting(&self) -> Option<&str> {
        if self.greeting.is_empty() {
            None
        } else {
            Some(&self.greeting)
        }
    }
}

/// Activity lifecycle settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// How long `close()` waits for an owned worker to stop, in milliseconds.
    #[serde(default = "default_shutdown_wait_ms")]
    pub shutdown_wait_ms: u64,
}

fn default_shutdown_wait_ms() -> u64 {
    crate::activity::DEFAULT_SHUTDOWN_WAIT.as_millis() as u64
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            shutdown_wait_ms: default_shutdown_wait_ms(),
        }
    }
}

impl ActivityConfig {
    /// Returns the shutdown wait as a duration.
    pub fn shutdown_wait(&self) -> Duration {
        Duration::from_millis(self.shutdown_wait_ms)
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ctk")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConsoleError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ConsoleError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
