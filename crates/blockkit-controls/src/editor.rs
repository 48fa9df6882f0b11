//! Control editor panel.
//!
//! Turns each control in a [`ControlListStore`] into a [`ControlPanelView`]
//! the UI can draw, and routes field events back into store operations. All
//! per-type decisions go through the store's [`TypeRegistry`].

use blockkit_core::{generate_control_name, validate_control_name, ControlId};
use serde_json::Value;

use crate::clipboard::{copy_with_fallback, Clipboard};
use crate::drag::{DragReorder, ItemBounds};
use crate::model::{number_from_f64, AssetRef, ControlPatch};
use crate::registry::{EditorWidget, ExtraFields};
use crate::store::ControlListStore;

/// External media picker.
pub trait AssetPicker {
    /// Let the user choose an asset. `None` when the picker was dismissed.
    fn pick(&self) -> Option<AssetRef>;
}

/// Everything needed to draw one control's editor.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanelView {
    pub id: ControlId,
    pub index: usize,
    /// Collapsed header text.
    pub header: String,
    pub name: String,
    pub label: String,
    pub type_key: String,
    pub type_label: String,
    pub is_open: bool,
    /// Whether this control is the one being dragged.
    pub is_dragging: bool,
    pub widget: EditorWidget,
    pub extra_fields: ExtraFields,
    pub code: String,
    pub example_output: String,
    pub help: Option<String>,
}

/// Field handlers and drag state for the list of control editors.
#[derive(Debug, Clone, Default)]
pub struct ControlEditorPanel {
    drag: DragReorder,
    focus_target: Option<ControlId>,
}

impl ControlEditorPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Views for every control, in list order.
    pub fn render(&self, store: &ControlListStore) -> Vec<ControlPanelView> {
        (0..store.len())
            .filter_map(|index| self.render_control(store, index))
            .collect()
    }

    pub fn render_control(
        &self,
        store: &ControlListStore,
        index: usize,
    ) -> Option<ControlPanelView> {
        let control = store.get(index)?;
        let registry = store.registry();

        Some(ControlPanelView {
            id: control.id,
            index,
            header: control.display_label().to_string(),
            name: control.name.clone(),
            label: control.label.clone(),
            type_key: control.control_type.clone(),
            type_label: registry.label_for(&control.control_type).to_string(),
            is_open: control.is_open,
            is_dragging: self.drag.dragged_index() == Some(index),
            widget: registry.widget_for(control),
            extra_fields: registry.extra_fields_for(control),
            code: registry.code_for(&control.control_type, &control.name),
            example_output: registry.example_for(&control.control_type).to_string(),
            help: control.help.clone(),
        })
    }

    pub fn on_label_input(&self, store: &mut ControlListStore, index: usize, label: &str) -> bool {
        store.update(index, ControlPatch::new().with_label(label))
    }

    /// Fill in a name from the label, once, while the name is still empty.
    pub fn on_label_blur(&self, store: &mut ControlListStore, index: usize) -> bool {
        let Some(control) = store.get(index) else {
            return false;
        };
        if !control.name.is_empty() {
            return false;
        }
        let generated = generate_control_name(&control.label);
        if generated.is_empty() {
            return false;
        }
        store.rename(index, "", &generated)
    }

    /// Sanitize the name while typing; trailing underscores are kept.
    pub fn on_name_input(&self, store: &mut ControlListStore, index: usize, raw: &str) -> bool {
        self.set_name(store, index, raw, false)
    }

    /// Final sanitize once the name field loses focus.
    pub fn on_name_blur(&self, store: &mut ControlListStore, index: usize) -> bool {
        let Some(current) = store.get(index).map(|c| c.name.clone()) else {
            return false;
        };
        self.set_name(store, index, &current, true)
    }

    fn set_name(
        &self,
        store: &mut ControlListStore,
        index: usize,
        raw: &str,
        strict: bool,
    ) -> bool {
        let Some(old) = store.get(index).map(|c| c.name.clone()) else {
            return false;
        };
        let sanitized = validate_control_name(raw, strict);
        if sanitized == old {
            return false;
        }
        if sanitized.trim().is_empty() {
            // A blank name is allowed while editing and caught on save.
            return store.update(index, ControlPatch::new().with_name(""));
        }
        store.rename(index, &old, &sanitized)
    }

    pub fn on_default_input(
        &self,
        store: &mut ControlListStore,
        index: usize,
        value: Value,
    ) -> bool {
        store.update(index, ControlPatch::new().with_default(value))
    }

    pub fn on_type_change(
        &self,
        store: &mut ControlListStore,
        index: usize,
        type_key: &str,
    ) -> bool {
        store.update(index, ControlPatch::new().with_type(type_key))
    }

    pub fn on_help_input(&self, store: &mut ControlListStore, index: usize, help: &str) -> bool {
        store.update(index, ControlPatch::new().with_help(help))
    }

    /// Edit of the range bounds; fields left blank keep their value.
    pub fn on_range_bounds(
        &self,
        store: &mut ControlListStore,
        index: usize,
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    ) -> bool {
        let patch = ControlPatch {
            min: min.and_then(number_from_f64),
            max: max.and_then(number_from_f64),
            step: step.and_then(number_from_f64),
            ..ControlPatch::default()
        };
        if patch.is_empty() {
            return false;
        }
        store.update(index, patch)
    }

    /// Open the asset picker and store the choice as the default value.
    pub fn pick_asset(
        &self,
        store: &mut ControlListStore,
        index: usize,
        picker: &dyn AssetPicker,
    ) -> bool {
        if store.get(index).is_none() {
            return false;
        }
        match picker.pick() {
            Some(asset) => {
                tracing::debug!("Picked asset {} for control at {}", asset.id, index);
                store.set_default_value(index, asset.to_value())
            }
            None => false,
        }
    }

    pub fn remove_asset(&self, store: &mut ControlListStore, index: usize) -> bool {
        store.set_default_value(index, Value::Null)
    }

    /// Copy the control's generated code.
    pub fn copy_code(
        &self,
        store: &ControlListStore,
        index: usize,
        primary: &mut dyn Clipboard,
        fallback: &mut dyn Clipboard,
    ) -> bool {
        let Some(control) = store.get(index) else {
            return false;
        };
        let code = store.registry().code_for(&control.control_type, &control.name);
        if code.is_empty() {
            return false;
        }
        copy_with_fallback(&code, primary, fallback)
    }

    /// Generated code of the whole block, one control after another.
    pub fn block_code(&self, store: &ControlListStore) -> String {
        let registry = store.registry();
        store
            .iter()
            .map(|c| registry.code_for(&c.control_type, &c.name))
            .filter(|code| !code.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Expand the control at `index` and make it the scroll target.
    pub fn focus_invalid(&mut self, store: &mut ControlListStore, index: usize) {
        self.focus_target = store.get(index).map(|c| c.id);
        if self.focus_target.is_some() {
            store.set_open(index, true);
        }
    }

    pub fn focus_target(&self) -> Option<ControlId> {
        self.focus_target
    }

    /// The view scrolled to the focus target.
    pub fn clear_focus(&mut self) {
        self.focus_target = None;
    }

    pub fn drag(&self) -> &DragReorder {
        &self.drag
    }

    pub fn press_handle(&mut self, index: usize) {
        self.drag.press_handle(index);
    }

    pub fn release_handle(&mut self) {
        self.drag.release_handle();
    }

    pub fn begin_drag(&mut self, index: usize) -> bool {
        self.drag.begin_drag(index)
    }

    pub fn hover(
        &mut self,
        store: &mut ControlListStore,
        hover_index: usize,
        pointer_y: f64,
        hovered: ItemBounds,
    ) -> Option<(usize, usize)> {
        self.drag.hover(store, hover_index, pointer_y, hovered)
    }

    pub fn drop_item(&mut self) -> Option<usize> {
        self.drag.drop_item()
    }

    pub fn pointer_released(&mut self) {
        self.drag.pointer_released();
    }
}
