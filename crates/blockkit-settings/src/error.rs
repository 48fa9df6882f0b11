//! Error types for the settings crate.
//!
//! This module provides structured error types for configuration management,
//! block settings persistence, and editing sessions.

use blockkit_core::ControlError;
use std::io;
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The block settings could not be loaded. Terminal for the session.
    #[error("Failed to load block settings: {0}")]
    LoadError(String),

    /// The block settings could not be saved. Edits are kept.
    #[error("Failed to save block settings: {0}")]
    SaveError(String),

    /// The control list failed save validation.
    #[error("Cannot save: {message}")]
    Validation {
        message: String,
        /// Index of the first offending control.
        first_invalid: usize,
    },

    /// A save was requested while another one is still in flight.
    #[error("A save is already in progress")]
    SaveInProgress,

    /// The session has not finished loading, or loading failed.
    #[error("Block settings are not loaded")]
    NotReady,

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    /// A control list error from the editing engine.
    #[error(transparent)]
    Control(#[from] ControlError),

    /// A core error, e.g. while loading the type registry.
    #[error(transparent)]
    Core(#[from] blockkit_core::Error),

    /// A configuration validation error occurred.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A persistence error occurred.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl SettingsError {
    pub fn is_validation_error(&self) -> bool {
        matches!(self, SettingsError::Validation { .. })
    }
}

/// Errors related to configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file format is not supported.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A configuration value is invalid.
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    /// Platform is not supported for config directory resolution.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

/// Errors related to block settings persistence.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The block id cannot be used as a storage key.
    #[error("Invalid block id: '{0}'")]
    InvalidBlockId(String),

    /// The stored block was written by an incompatible version.
    #[error("Unsupported block file version: {0}")]
    UnsupportedVersion(String),

    /// The repository refused or failed the operation.
    #[error("Repository unavailable: {0}")]
    Unavailable(String),

    /// I/O error during persistence.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON error during persistence.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;
