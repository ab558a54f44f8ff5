//! Standard paths used by cadence

use std::path::PathBuf;

/// Standard cadence paths
pub struct Paths {
    /// Data directory (~/.local/share/cadence)
    pub data: PathBuf,
    /// Config directory (~/.config/cadence)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("cadence");

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("cadence");

        Self { data, config }
    }

    /// Path of the main configuration file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    /// Directory holding phase history logs
    pub fn history(&self) -> PathBuf {
        self.data.join("history")
    }
}
