//! Block settings repositories.
//!
//! A repository stores the persisted settings of each block under its block
//! id. Loading a block that was never saved yields `None`; the session then
//! starts a new block.

use async_trait::async_trait;
use blockkit_controls::PersistedBlockSettings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::error::{PersistenceError, PersistenceResult};

/// Block file format version
const BLOCK_FILE_VERSION: &str = "1.0";

/// Storage for block settings.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load a block's settings, `None` if it has never been saved.
    async fn load(&self, block_id: &str) -> PersistenceResult<Option<PersistedBlockSettings>>;

    /// Store a block's settings, replacing what was there.
    async fn save(&self, block_id: &str, settings: &PersistedBlockSettings)
        -> PersistenceResult<()>;

    /// Ids of every stored block, sorted.
    async fn list(&self) -> PersistenceResult<Vec<String>>;
}

/// Block ids become file names, so only a conservative alphabet is allowed.
pub fn validate_block_id(block_id: &str) -> PersistenceResult<()> {
    let valid = !block_id.is_empty()
        && block_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PersistenceError::InvalidBlockId(block_id.to_string()))
    }
}

/// On-disk envelope around a block's settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredBlock {
    pub version: String,
    pub modified: DateTime<Utc>,
    pub settings: PersistedBlockSettings,
}

impl StoredBlock {
    pub fn new(settings: PersistedBlockSettings) -> Self {
        Self {
            version: BLOCK_FILE_VERSION.to_string(),
            modified: Utc::now(),
            settings,
        }
    }

    fn check_version(&self) -> PersistenceResult<()> {
        let major = |v: &str| v.split('.').next().map(str::to_string);
        if major(&self.version) == major(BLOCK_FILE_VERSION) {
            Ok(())
        } else {
            Err(PersistenceError::UnsupportedVersion(self.version.clone()))
        }
    }
}

/// One `<block_id>.json` file per block in a data directory.
#[derive(Debug, Clone)]
pub struct FileSettingsRepository {
    data_dir: PathBuf,
}

impl FileSettingsRepository {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn block_path(&self, block_id: &str) -> PersistenceResult<PathBuf> {
        validate_block_id(block_id)?;
        Ok(self.data_dir.join(format!("{block_id}.json")))
    }
}

#[async_trait]
impl SettingsRepository for FileSettingsRepository {
    async fn load(&self, block_id: &str) -> PersistenceResult<Option<PersistedBlockSettings>> {
        let path = self.block_path(block_id)?;
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No stored settings for block '{}'", block_id);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let stored: StoredBlock = serde_json::from_str(&content)?;
        stored.check_version()?;
        tracing::info!(
            "Loaded block '{}' (modified {})",
            block_id,
            stored.modified.to_rfc3339()
        );
        Ok(Some(stored.settings))
    }

    async fn save(
        &self,
        block_id: &str,
        settings: &PersistedBlockSettings,
    ) -> PersistenceResult<()> {
        let path = self.block_path(block_id)?;
        tokio::fs::create_dir_all(&self.data_dir).await?;

        let content = serde_json::to_string_pretty(&StoredBlock::new(settings.clone()))?;
        tokio::fs::write(&path, content).await?;
        tracing::info!("Saved block '{}' to {}", block_id, path.display());
        Ok(())
    }

    async fn list(&self) -> PersistenceResult<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.data_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if validate_block_id(stem).is_ok() {
                        ids.push(stem.to_string());
                    }
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// Repository held in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySettingsRepository {
    blocks: Mutex<HashMap<String, PersistedBlockSettings>>,
    saves: AtomicUsize,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored block.
    pub fn with_block(
        mut self,
        block_id: impl Into<String>,
        settings: PersistedBlockSettings,
    ) -> Self {
        self.blocks.get_mut().insert(block_id.into(), settings);
        self
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn get(&self, block_id: &str) -> Option<PersistedBlockSettings> {
        self.blocks.lock().await.get(block_id).cloned()
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn load(&self, block_id: &str) -> PersistenceResult<Option<PersistedBlockSettings>> {
        Ok(self.blocks.lock().await.get(block_id).cloned())
    }

    async fn save(
        &self,
        block_id: &str,
        settings: &PersistedBlockSettings,
    ) -> PersistenceResult<()> {
        validate_block_id(block_id)?;
        self.blocks
            .lock()
            .await
            .insert(block_id.to_string(), settings.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list(&self) -> PersistenceResult<Vec<String>> {
        let mut ids: Vec<String> = self.blocks.lock().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_block_id() {
        assert!(validate_block_id("hero-banner_2").is_ok());
        assert!(validate_block_id("").is_err());
        assert!(validate_block_id("../secrets").is_err());
        assert!(validate_block_id("a b").is_err());
    }

    #[test]
    fn test_version_check_compares_major() {
        let mut stored = StoredBlock::new(PersistedBlockSettings::default());
        assert!(stored.check_version().is_ok());
        stored.version = "1.3".to_string();
        assert!(stored.check_version().is_ok());
        stored.version = "2.0".to_string();
        assert!(matches!(
            stored.check_version(),
            Err(PersistenceError::UnsupportedVersion(v)) if v == "2.0"
        ));
    }

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let repo = InMemorySettingsRepository::new();
        assert!(repo.load("hero").await.unwrap().is_none());

        let mut settings = PersistedBlockSettings::default();
        settings.metadata.title = "Hero".to_string();
        repo.save("hero", &settings).await.unwrap();

        assert_eq!(repo.load("hero").await.unwrap(), Some(settings));
        assert_eq!(repo.save_count(), 1);
        assert_eq!(repo.list().await.unwrap(), vec!["hero".to_string()]);
    }
}
