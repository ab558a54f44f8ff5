//! Configuration management for cadence
//!
//! Stored as JSON at `~/.config/cadence/config.json`. Every key is optional;
//! missing keys fall back to the classic 25/5/15 minute rhythm.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{key} must be at least one second")]
    ZeroDuration { key: &'static str },

    #[error("longRestInterval must be at least 1")]
    ZeroLongRestInterval,
}

/// Timer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Length of a focus phase in seconds
    #[serde(default = "default_focus_seconds")]
    pub focus_seconds: u32,

    /// Length of a short rest in seconds
    #[serde(default = "default_short_rest_seconds")]
    pub short_rest_seconds: u32,

    /// Length of a long rest in seconds
    #[serde(default = "default_long_rest_seconds")]
    pub long_rest_seconds: u32,

    /// Every n-th completed focus phase is followed by a long rest
    #[serde(default = "default_long_rest_interval")]
    pub long_rest_interval: u32,

    /// Start the next phase automatically when one expires
    #[serde(default = "default_auto_start")]
    pub auto_start: bool,
}

fn default_focus_seconds() -> u32 {
    25 * 60
}
fn default_short_rest_seconds() -> u32 {
    5 * 60
}
fn default_long_rest_seconds() -> u32 {
    15 * 60
}
fn default_long_rest_interval() -> u32 {
    4
}
fn default_auto_start() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            focus_seconds: default_focus_seconds(),
            short_rest_seconds: default_short_rest_seconds(),
            long_rest_seconds: default_long_rest_seconds(),
            long_rest_interval: default_long_rest_interval(),
            auto_start: default_auto_start(),
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the timer cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("focusSeconds", self.focus_seconds),
            ("shortRestSeconds", self.short_rest_seconds),
            ("longRestSeconds", self.long_rest_seconds),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroDuration { key });
            }
        }

        if self.long_rest_interval == 0 {
            return Err(ConfigError::ZeroLongRestInterval);
        }

        Ok(())
    }
}
