//! # BlockKit Controls
//!
//! The control-list editing engine: the ordered collection of control
//! definitions attached to a content block, and everything that edits it.
//!
//! ## Core Components
//!
//! - **Model**: control definitions, options, block metadata and style variants
//! - **Registry**: type key to descriptor lookup, loaded once per session, and
//!   the dispatch from a type to its widget, extra fields, code and example
//! - **Drag**: the `Idle → Armed → Dragging` reorder state machine
//! - **Store**: CRUD and reorder operations plus the dirty flag
//! - **Editor**: per-control view models and field handlers
//! - **Serialization**: ordered list ⇄ keyed mapping, with save validation
//!
//! ## Architecture
//!
//! ```text
//! Repository mapping ──to_ordered_list──▶ ControlListStore ◀── ControlEditorPanel
//!                                              │                    │
//!                                              │               TypeRegistry
//!                                              ▼
//!                      ◀──to_keyed_mapping── validate_controls
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use blockkit_controls::{ControlListStore, TypeRegistry};
//!
//! let registry = Arc::new(TypeRegistry::builtin());
//! let mut store = ControlListStore::new(registry);
//! store.add("text");
//! store.add("range");
//! store.move_control(0, 1);
//! ```

pub mod clipboard;
pub mod drag;
pub mod editor;
pub mod model;
pub mod registry;
pub mod serialization;
pub mod store;

pub use clipboard::{
    copy_with_fallback, Clipboard, ClipboardError, FallbackClipboard, SystemClipboard,
};
pub use drag::{DragReorder, DragState, ItemBounds, Reorderable};
pub use editor::{AssetPicker, ControlEditorPanel, ControlPanelView};
pub use model::{
    AssetRef, BlockMetadata, BlockSettings, ControlDefinition, ControlList, ControlOption,
    ControlPatch, StyleVariant, ValueKind,
};
pub use registry::{
    sanitize_variable_name, ControlKind, EditorWidget, ExtraFields, OptionRow, TypeDescriptor,
    TypeRegistry,
};
pub use serialization::{
    to_keyed_mapping, to_ordered_list, validate_controls, PersistedBlockSettings,
};
pub use store::ControlListStore;
