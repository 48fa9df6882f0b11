//! Configuration for BlockKit
//!
//! Configuration file handling and validation. Supports JSON and TOML files,
//! chosen by file extension.
//!
//! Configuration is organized into logical sections:
//! - Repository settings (where block settings are stored)
//! - Registry settings (where control types come from)
//! - Editor preferences (leave confirmation, new control state)

use blockkit_controls::TypeRegistry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SettingsResult};

/// Config file format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("(none)").to_string(),
            )),
        }
    }
}

/// Block settings storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySettings {
    /// Directory holding one JSON file per block
    pub data_dir: PathBuf,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        let mut data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        data_dir.push("blockkit");
        data_dir.push("blocks");
        Self { data_dir }
    }
}

/// Control type source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// JSON type source; the built-in types are used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types_file: Option<PathBuf>,
}

/// Editor preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Ask before leaving a block with unsaved edits
    pub confirm_before_leave: bool,
    /// Expand newly added controls
    pub open_new_controls: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            confirm_before_leave: true,
            open_new_controls: true,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub repository: RepositorySettings,
    pub registry: RegistrySettings,
    pub editor: EditorSettings,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repository.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "repository.data_dir".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if let Some(types_file) = &self.registry.types_file {
            if types_file.extension().is_none_or(|ext| ext != "json") {
                return Err(ConfigError::InvalidValue {
                    key: "registry.types_file".to_string(),
                    reason: format!("{} is not a .json file", types_file.display()),
                });
            }
        }

        Ok(())
    }

    /// Build the session's type registry.
    pub fn type_registry(&self) -> SettingsResult<TypeRegistry> {
        match &self.registry.types_file {
            Some(path) => Ok(TypeRegistry::load_from_file(path)?),
            None => Ok(TypeRegistry::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SettingsError;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert!(config.editor.confirm_before_leave);
        assert!(config.editor.open_new_controls);
        assert!(config.registry.types_file.is_none());
        assert!(config.repository.data_dir.ends_with("blockkit/blocks"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_and_json_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::new();
        config.repository.data_dir = dir.path().join("blocks");
        config.editor.open_new_controls = false;

        for file in ["config.toml", "config.json"] {
            let path = dir.path().join(file);
            config.save_to_file(&path).unwrap();
            assert_eq!(Config::load_from_file(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[editor]\nconfirm_before_leave = false\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert!(!config.editor.confirm_before_leave);
        assert!(config.editor.open_new_controls);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Config::new()
            .save_to_file(Path::new("/tmp/config.yaml"))
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Config(ConfigError::UnsupportedFormat(ref ext)) if ext == "yaml"
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::new();
        config.repository.data_dir = PathBuf::new();
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.registry.types_file = Some(PathBuf::from("types.yaml"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_type_registry_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("types.json");
        std::fs::write(&path, r#"{ "text": { "label": "Text" }, "range": { "label": "Range" } }"#)
            .unwrap();

        let mut config = Config::new();
        assert_eq!(config.type_registry().unwrap().len(), 10);

        config.registry.types_file = Some(path);
        let registry = config.type_registry().unwrap();
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["text", "range"]);
    }
}
