//! Settings manager: locates, loads and saves the configuration file.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{ConfigError, SettingsResult};

const CONFIG_DIR_NAME: &str = "blockkit";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Owns the active [`Config`] and the file it came from.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    config_path: PathBuf,
    config: Config,
}

impl SettingsManager {
    /// Default config file location, e.g. `~/.config/blockkit/config.toml`.
    pub fn default_config_path() -> SettingsResult<PathBuf> {
        let mut path = dirs::config_dir().ok_or_else(|| {
            ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string())
        })?;
        path.push(CONFIG_DIR_NAME);
        path.push(CONFIG_FILE_NAME);
        Ok(path)
    }

    /// Load from the default location.
    pub fn new() -> SettingsResult<Self> {
        Self::load(&Self::default_config_path()?)
    }

    /// Load `path`, or start from defaults when it does not exist yet.
    pub fn load(path: &Path) -> SettingsResult<Self> {
        let config = if path.exists() {
            Config::load_from_file(path)?
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Config::default()
        };
        Ok(Self {
            config_path: path.to_path_buf(),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Write the config back, creating its directory if needed.
    pub fn save(&self) -> SettingsResult<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.config.save_to_file(&self.config_path)?;
        tracing::info!("Saved config to {}", self.config_path.display());
        Ok(())
    }
}
