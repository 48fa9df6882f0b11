//! Editing session for one block.
//!
//! Ties a [`SettingsRepository`] to the control list store and editor panel:
//! loads the block once, tracks unsaved edits, and saves. A save is split
//! into [`EditingSession::begin_save`] and [`EditingSession::finish_save`] so
//! an event loop can run the repository call itself; [`EditingSession::save`]
//! does both.

use blockkit_controls::{
    to_keyed_mapping, validate_controls, BlockMetadata, BlockSettings, ControlEditorPanel,
    ControlListStore, PersistedBlockSettings, TypeRegistry,
};
use blockkit_core::{ControlError, ControlId};
use serde_json::Value;
use std::sync::Arc;

use crate::config::EditorSettings;
use crate::error::{PersistenceResult, SettingsError, SettingsResult};
use crate::repository::SettingsRepository;

/// Lifecycle of the session's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the repository; the form is not available.
    Loading,
    Ready,
    /// Loading failed; the form stays unavailable for this session.
    LoadFailed(String),
}

/// One block being edited.
pub struct EditingSession {
    block_id: String,
    repository: Arc<dyn SettingsRepository>,
    editor_settings: EditorSettings,
    state: SessionState,
    metadata: BlockMetadata,
    store: ControlListStore,
    panel: ControlEditorPanel,
    metadata_dirty: bool,
    metadata_revision: u64,
    /// Store and metadata revisions captured by `begin_save`.
    saving_revisions: Option<(u64, u64)>,
    last_error: Option<String>,
}

impl EditingSession {
    pub fn new(
        block_id: impl Into<String>,
        repository: Arc<dyn SettingsRepository>,
        registry: Arc<TypeRegistry>,
    ) -> Self {
        Self {
            block_id: block_id.into(),
            repository,
            editor_settings: EditorSettings::default(),
            state: SessionState::Loading,
            metadata: BlockMetadata::default(),
            store: ControlListStore::new(registry),
            panel: ControlEditorPanel::new(),
            metadata_dirty: false,
            metadata_revision: 0,
            saving_revisions: None,
            last_error: None,
        }
    }

    pub fn with_editor_settings(mut self, editor_settings: EditorSettings) -> Self {
        self.editor_settings = editor_settings;
        self
    }

    /// Load the block. A block that was never saved starts out empty.
    pub async fn load(&mut self) -> SettingsResult<()> {
        let registry = Arc::clone(self.store.registry());
        self.state = SessionState::Loading;

        let loaded = match self.repository.load(&self.block_id).await {
            Ok(Some(persisted)) => {
                BlockSettings::from_persisted(persisted, &registry).map_err(|e| e.to_string())
            }
            Ok(None) => {
                tracing::info!("Block '{}' not stored yet, starting a new one", self.block_id);
                Ok(BlockSettings::new(self.block_id.clone()))
            }
            Err(e) => Err(e.to_string()),
        };

        match loaded {
            Ok(settings) => {
                tracing::info!(
                    "Editing block '{}' with {} controls",
                    self.block_id,
                    settings.controls.len()
                );
                self.metadata = settings.metadata;
                self.store = ControlListStore::with_controls(registry, settings.controls);
                self.metadata_dirty = false;
                self.saving_revisions = None;
                self.last_error = None;
                self.state = SessionState::Ready;
                Ok(())
            }
            Err(message) => {
                tracing::error!("Failed to load block '{}': {}", self.block_id, message);
                self.state = SessionState::LoadFailed(message.clone());
                self.last_error = Some(message.clone());
                Err(SettingsError::LoadError(message))
            }
        }
    }

    pub fn block_id(&self) -> &str {
        &self.block_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    pub fn metadata(&self) -> &BlockMetadata {
        &self.metadata
    }

    pub fn store(&self) -> &ControlListStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ControlListStore {
        &mut self.store
    }

    pub fn panel(&self) -> &ControlEditorPanel {
        &self.panel
    }

    /// Panel and store together, for event handlers that need both.
    pub fn editor_mut(&mut self) -> (&mut ControlEditorPanel, &mut ControlListStore) {
        (&mut self.panel, &mut self.store)
    }

    /// Add a control, expanded or not as configured.
    pub fn add_control(&mut self, control_type: &str) -> ControlId {
        let id = self.store.add(control_type);
        if !self.editor_settings.open_new_controls {
            let index = self.store.len() - 1;
            self.store.set_open(index, false);
        }
        id
    }

    /// Current settings as one aggregate.
    pub fn block_settings(&self) -> BlockSettings {
        BlockSettings {
            metadata: self.metadata.clone(),
            controls: self.store.controls().to_vec(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.edit_metadata(|m| replace(&mut m.title, title));
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = description.into();
        self.edit_metadata(|m| replace(&mut m.description, description));
    }

    pub fn set_icon(&mut self, icon: impl Into<String>) {
        let icon = icon.into();
        self.edit_metadata(|m| replace(&mut m.icon, icon));
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        self.edit_metadata(|m| replace(&mut m.category, category));
    }

    pub fn set_keywords(&mut self, keywords: Vec<String>) {
        self.edit_metadata(|m| replace(&mut m.keywords, keywords));
    }

    pub fn set_supports(&mut self, feature: &str, enabled: bool) {
        self.edit_metadata(|m| {
            let changed = m.supports.get(feature) != Some(&enabled);
            m.set_support(feature, enabled);
            changed
        });
    }

    pub fn add_style(&mut self, name: &str, label: &str) -> bool {
        self.edit_metadata(|m| m.add_style(name, label))
    }

    pub fn remove_style(&mut self, name: &str) -> bool {
        self.edit_metadata(|m| m.remove_style(name))
    }

    pub fn set_default_style(&mut self, name: &str) -> bool {
        self.edit_metadata(|m| m.set_default_style(name))
    }

    fn edit_metadata(&mut self, edit: impl FnOnce(&mut BlockMetadata) -> bool) -> bool {
        let changed = edit(&mut self.metadata);
        if changed {
            self.metadata_dirty = true;
            self.metadata_revision += 1;
        }
        changed
    }

    /// Unsaved edits to the metadata or the controls.
    pub fn is_dirty(&self) -> bool {
        self.metadata_dirty || self.store.is_dirty()
    }

    /// Whether leaving now should ask the user first.
    pub fn needs_leave_confirmation(&self) -> bool {
        self.editor_settings.confirm_before_leave && self.is_dirty()
    }

    pub fn is_saving(&self) -> bool {
        self.saving_revisions.is_some()
    }

    /// Message of the last failed load or save.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Validate and fold the current state for saving.
    ///
    /// On a validation failure the first offending control becomes the
    /// panel's focus target and nothing is marked as saving.
    pub fn begin_save(&mut self) -> SettingsResult<PersistedBlockSettings> {
        if !self.is_ready() {
            return Err(SettingsError::NotReady);
        }
        if self.is_saving() {
            return Err(SettingsError::SaveInProgress);
        }

        if let Err(e) = validate_controls(self.store.controls()) {
            self.last_error = Some(e.to_string());
            return Err(match e {
                ControlError::Validation {
                    message,
                    first_invalid,
                } => {
                    tracing::warn!("Save blocked by validation: {}", message);
                    let (panel, store) = self.editor_mut();
                    panel.focus_invalid(store, first_invalid);
                    SettingsError::Validation {
                        message,
                        first_invalid,
                    }
                }
                other => other.into(),
            });
        }

        let controls = to_keyed_mapping(self.store.controls())?;
        self.saving_revisions = Some((self.store.revision(), self.metadata_revision));
        Ok(PersistedBlockSettings {
            metadata: self.metadata.clone(),
            controls: Value::Object(controls),
        })
    }

    /// Record the outcome of the repository save started by `begin_save`.
    ///
    /// Edits made while the save was in flight were not part of the payload
    /// and keep the session dirty.
    pub fn finish_save(&mut self, result: PersistenceResult<()>) -> SettingsResult<()> {
        let saved = self.saving_revisions.take();
        match result {
            Ok(()) => {
                if let Some((store_revision, metadata_revision)) = saved {
                    if self.store.revision() == store_revision {
                        self.store.mark_clean();
                    }
                    if self.metadata_revision == metadata_revision {
                        self.metadata_dirty = false;
                    }
                }
                if self.is_dirty() {
                    tracing::debug!("Block '{}' changed while saving", self.block_id);
                }
                self.last_error = None;
                tracing::info!("Saved block '{}'", self.block_id);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to save block '{}': {}", self.block_id, e);
                self.last_error = Some(e.to_string());
                Err(SettingsError::SaveError(e.to_string()))
            }
        }
    }

    pub async fn save(&mut self) -> SettingsResult<()> {
        let payload = self.begin_save()?;
        let result = self.repository.save(&self.block_id, &payload).await;
        self.finish_save(result)
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
