// CLI configuration file handling

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::filter::FilterMode;

/// Optional YAML config for the CLI. Everything has a default, so a
/// missing file is fine; a malformed one is a real error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Slot file holding the task list; defaults to the platform data dir
    pub store_path: Option<PathBuf>,
    /// Filter applied to `list` when no --filter flag is given
    pub default_filter: FilterMode,
}

impl Config {
    /// Load from the default config location
    pub fn load() -> Result<Self> {
        Self::load_from(&default_config_path())
    }

    /// Load from an explicit path; absent file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(config = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = serde_yaml::from_str(&data).context("Failed to parse config file")?;
        debug!(config = ?path, "Loaded config");
        Ok(config)
    }

    /// Slot path to use, falling back to the platform default
    pub fn slot_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(default_slot_path)
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("todostore")
        .join("config.yaml")
}

/// Default slot location under the platform data directory
pub fn default_slot_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("todostore")
        .join("tasks.json")
}
