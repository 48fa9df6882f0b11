//! BlockKit Settings Crate
//!
//! Handles application configuration, block settings persistence, and the
//! editing session that loads and saves one block.

pub mod config;
pub mod error;
pub mod manager;
pub mod repository;
pub mod session;

pub use config::{Config, ConfigFormat, EditorSettings, RegistrySettings, RepositorySettings};
pub use error::{
    ConfigError, ConfigResult, PersistenceError, PersistenceResult, SettingsError, SettingsResult,
};
pub use manager::SettingsManager;
pub use repository::{
    validate_block_id, FileSettingsRepository, InMemorySettingsRepository, SettingsRepository,
    StoredBlock,
};
pub use session::{EditingSession, SessionState};
