//! Control list store.
//!
//! Owns the ordered [`ControlList`] of one block plus its dirty flag. Every
//! mutation marks the list dirty; only a successful save clears it again.
//! Indices are positions in the current order. An out-of-range index is a
//! caller bug and turns the operation into a logged no-op.

use blockkit_core::constants::{COPY_LABEL_SUFFIX, COPY_NAME_SUFFIX};
use blockkit_core::ControlId;
use serde_json::Value;
use std::sync::Arc;

use crate::drag::Reorderable;
use crate::model::{coerce_number, ControlDefinition, ControlList, ControlOption, ControlPatch};
use crate::registry::TypeRegistry;

/// Ordered controls of one block, with CRUD and reorder operations.
#[derive(Debug, Clone)]
pub struct ControlListStore {
    registry: Arc<TypeRegistry>,
    controls: ControlList,
    is_dirty: bool,
    revision: u64,
}

impl ControlListStore {
    /// Creates an empty, clean store.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_controls(registry, Vec::new())
    }

    /// Creates a clean store around an already loaded list.
    pub fn with_controls(registry: Arc<TypeRegistry>, controls: ControlList) -> Self {
        Self {
            registry,
            controls,
            is_dirty: false,
            revision: 0,
        }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn controls(&self) -> &[ControlDefinition] {
        &self.controls
    }

    pub fn get(&self, index: usize) -> Option<&ControlDefinition> {
        self.controls.get(index)
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControlDefinition> {
        self.controls.iter()
    }

    /// Current position of the control with `id`.
    pub fn find_by_id(&self, id: ControlId) -> Option<usize> {
        self.controls.iter().position(|c| c.id == id)
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Clears the dirty flag after the list has been persisted.
    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
    }

    /// Counter bumped by every mutation that marks the list dirty.
    ///
    /// A saver records it before persisting and only marks the list clean
    /// if it has not moved by the time the save succeeds.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn mark_dirty(&mut self) {
        self.is_dirty = true;
        self.revision += 1;
    }

    pub fn into_controls(self) -> ControlList {
        self.controls
    }

    /// Appends a new, blank, expanded control of `control_type`.
    pub fn add(&mut self, control_type: &str) -> ControlId {
        let mut control = ControlDefinition::new(control_type);
        control.attribute_type = self.registry.value_kind(control_type);
        if self.registry.is_enumerable(control_type) {
            control.options = Some(Vec::new());
        }

        let id = control.id;
        self.controls.push(control);
        self.mark_dirty();
        tracing::debug!("Added {} control {} at {}", control_type, id, self.controls.len() - 1);
        id
    }

    /// Removes and returns the control at `index`.
    pub fn remove(&mut self, index: usize) -> Option<ControlDefinition> {
        if !self.check_index("remove", index) {
            return None;
        }
        let removed = self.controls.remove(index);
        self.mark_dirty();
        tracing::debug!("Removed control {} from {}", removed.id, index);
        Some(removed)
    }

    /// Shallow-merges `patch` into the control at `index`.
    ///
    /// A new default is coerced to a number when the control's type is
    /// numeric. Changing the type re-derives the attribute type and gives
    /// enumerable types an option list.
    pub fn update(&mut self, index: usize, patch: ControlPatch) -> bool {
        if !self.check_index("update", index) {
            return false;
        }
        let registry = &self.registry;
        let control = &mut self.controls[index];

        if let Some(control_type) = patch.control_type {
            control.attribute_type = registry.value_kind(&control_type);
            if registry.is_enumerable(&control_type) && control.options.is_none() {
                control.options = Some(Vec::new());
            }
            control.control_type = control_type;
        }
        if let Some(label) = patch.label {
            control.label = label;
        }
        if let Some(name) = patch.name {
            control.name = name;
        }
        if let Some(value) = patch.default_value {
            let numeric = registry.value_kind(&control.control_type).is_numeric();
            control.default_value = Some(if numeric { coerce_number(value) } else { value });
        }
        if let Some(options) = patch.options {
            control.options = Some(options);
        }
        if patch.min.is_some() {
            control.min = patch.min;
        }
        if patch.max.is_some() {
            control.max = patch.max;
        }
        if patch.step.is_some() {
            control.step = patch.step;
        }
        if let Some(help) = patch.help {
            control.help = Some(help).filter(|h| !h.trim().is_empty());
        }
        if let Some(is_open) = patch.is_open {
            control.is_open = is_open;
        }

        self.mark_dirty();
        tracing::debug!("Updated control {} at {}", self.controls[index].id, index);
        true
    }

    /// Renames the control at `index` to the trimmed `new_name`.
    ///
    /// Does nothing when the trimmed names are equal.
    pub fn rename(&mut self, index: usize, old_name: &str, new_name: &str) -> bool {
        if old_name.trim() == new_name.trim() {
            return false;
        }
        if !self.check_index("rename", index) {
            return false;
        }
        self.controls[index].name = new_name.trim().to_string();
        self.mark_dirty();
        tracing::debug!(
            "Renamed control at {} from '{}' to '{}'",
            index,
            old_name.trim(),
            new_name.trim()
        );
        true
    }

    /// Appends a copy of the control at `index` and returns the copy's id.
    pub fn duplicate(&mut self, index: usize) -> Option<ControlId> {
        if !self.check_index("duplicate", index) {
            return None;
        }
        let mut copy = self.controls[index].clone();
        copy.id = ControlId::new();
        copy.label.push_str(COPY_LABEL_SUFFIX);
        copy.name.push_str(COPY_NAME_SUFFIX);
        copy.is_open = true;

        let id = copy.id;
        self.controls.push(copy);
        self.mark_dirty();
        tracing::debug!("Duplicated control at {} as {}", index, id);
        Some(id)
    }

    /// Moves the control at `from` to `to`, keeping everything else in order.
    pub fn move_control(&mut self, from: usize, to: usize) -> bool {
        if !self.check_index("move", from) || !self.check_index("move", to) {
            return false;
        }
        if from == to {
            return false;
        }
        let control = self.controls.remove(from);
        self.controls.insert(to, control);
        self.mark_dirty();
        tracing::debug!("Moved control from {} to {}", from, to);
        true
    }

    /// Flips the expand/collapse flag. UI state only, so the list stays clean.
    pub fn toggle_open(&mut self, index: usize) -> bool {
        self.set_open(index, !self.get(index).is_some_and(|c| c.is_open))
    }

    pub fn set_open(&mut self, index: usize, is_open: bool) -> bool {
        match self.controls.get_mut(index) {
            Some(control) => {
                control.is_open = is_open;
                true
            }
            None => {
                self.warn_out_of_range("set_open", index);
                false
            }
        }
    }

    /// Sets the default value directly, bypassing numeric coercion.
    ///
    /// Used for structured values such as a picked asset or `null`.
    pub fn set_default_value(&mut self, index: usize, value: Value) -> bool {
        if !self.check_index("set_default_value", index) {
            return false;
        }
        self.controls[index].default_value = Some(value);
        self.mark_dirty();
        true
    }

    /// Appends a blank option to an enumerable control.
    pub fn add_option(&mut self, index: usize) -> Option<usize> {
        let options = self.options_mut("add_option", index)?;
        options.push(ControlOption::default());
        let position = options.len() - 1;
        self.mark_dirty();
        Some(position)
    }

    pub fn update_option(&mut self, index: usize, option: usize, value: ControlOption) -> bool {
        let Some(options) = self.options_mut("update_option", index) else {
            return false;
        };
        let Some(slot) = options.get_mut(option) else {
            tracing::warn!("update_option: option {} out of range for control {}", option, index);
            return false;
        };
        *slot = value;
        self.mark_dirty();
        true
    }

    pub fn remove_option(&mut self, index: usize, option: usize) -> Option<ControlOption> {
        let options = self.options_mut("remove_option", index)?;
        if option >= options.len() {
            tracing::warn!("remove_option: option {} out of range for control {}", option, index);
            return None;
        }
        let removed = options.remove(option);
        self.mark_dirty();
        Some(removed)
    }

    /// Swaps an option with the one above it. The first option stays put.
    pub fn move_option_up(&mut self, index: usize, option: usize) -> bool {
        if option == 0 {
            return false;
        }
        self.swap_options("move_option_up", index, option - 1, option)
    }

    /// Swaps an option with the one below it. The last option stays put.
    pub fn move_option_down(&mut self, index: usize, option: usize) -> bool {
        self.swap_options("move_option_down", index, option, option + 1)
    }

    fn swap_options(&mut self, op: &str, index: usize, a: usize, b: usize) -> bool {
        let Some(options) = self.options_mut(op, index) else {
            return false;
        };
        if b >= options.len() {
            return false;
        }
        options.swap(a, b);
        self.mark_dirty();
        true
    }

    fn options_mut(&mut self, op: &str, index: usize) -> Option<&mut Vec<ControlOption>> {
        if !self.check_index(op, index) {
            return None;
        }
        let control = &mut self.controls[index];
        if !self.registry.is_enumerable(&control.control_type) {
            tracing::warn!(
                "{}: control {} of type '{}' has no options",
                op,
                index,
                control.control_type
            );
            return None;
        }
        Some(control.options.get_or_insert_with(Vec::new))
    }

    fn check_index(&self, op: &str, index: usize) -> bool {
        if index < self.controls.len() {
            true
        } else {
            self.warn_out_of_range(op, index);
            false
        }
    }

    fn warn_out_of_range(&self, op: &str, index: usize) {
        tracing::warn!(
            "{}: index {} out of range for {} controls",
            op,
            index,
            self.controls.len()
        );
    }
}

impl Reorderable for ControlListStore {
    fn item_count(&self) -> usize {
        self.len()
    }

    fn move_item(&mut self, from: usize, to: usize) {
        self.move_control(from, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::{DragReorder, ItemBounds};
    use crate::model::ValueKind;
    use proptest::prelude::*;
    use serde_json::json;

    fn store() -> ControlListStore {
        ControlListStore::new(Arc::new(TypeRegistry::builtin()))
    }

    fn labelled(labels: &[&str]) -> ControlListStore {
        let mut store = store();
        for (i, label) in labels.iter().enumerate() {
            store.add("text");
            store.update(i, ControlPatch::new().with_label(*label).with_name(label.to_lowercase()));
        }
        store.mark_clean();
        store
    }

    fn labels(store: &ControlListStore) -> Vec<&str> {
        store.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_add_then_move() {
        let mut store = store();
        store.add("text");
        store.add("range");
        assert!(store.move_control(0, 1));

        let types: Vec<_> = store.iter().map(|c| c.control_type.as_str()).collect();
        assert_eq!(types, vec!["range", "text"]);
        assert!(store.is_dirty());
    }

    #[test]
    fn test_add_initializes_new_control() {
        let mut store = store();
        let text = store.add("text");
        let select = store.add("select");

        let text = &store.controls()[store.find_by_id(text).unwrap()];
        assert!(text.is_open);
        assert!(text.name.is_empty() && text.label.is_empty());
        assert_eq!(text.options, None);

        let select = &store.controls()[store.find_by_id(select).unwrap()];
        assert_eq!(select.options, Some(vec![]));
        assert_eq!(select.attribute_type, ValueKind::String);
    }

    #[test]
    fn test_numeric_default_is_coerced() {
        let mut store = store();
        store.add("range");
        store.update(0, ControlPatch::new().with_default("5"));
        assert_eq!(store.get(0).unwrap().default_value, Some(json!(5)));

        store.add("text");
        store.update(1, ControlPatch::new().with_default("5"));
        assert_eq!(store.get(1).unwrap().default_value, Some(json!("5")));
    }

    #[test]
    fn test_type_change_rederives_attribute_type() {
        let mut store = store();
        store.add("text");
        store.update(0, ControlPatch::new().with_type("toggle"));
        assert_eq!(store.get(0).unwrap().attribute_type, ValueKind::Boolean);

        store.update(0, ControlPatch::new().with_type("radio"));
        assert_eq!(store.get(0).unwrap().options, Some(vec![]));
    }

    #[test]
    fn test_rename_trims_and_skips_no_ops() {
        let mut store = labelled(&["Title"]);
        assert!(!store.rename(0, "title", "  title "));
        assert!(!store.is_dirty());

        assert!(store.rename(0, "title", " heading "));
        assert_eq!(store.get(0).unwrap().name, "heading");
        assert!(store.is_dirty());
    }

    #[test]
    fn test_duplicate_appends_copy() {
        let mut store = labelled(&["Title", "Body"]);
        let original = store.get(0).unwrap().id;
        let copy_id = store.duplicate(0).unwrap();

        assert_eq!(store.len(), 3);
        let copy = store.get(2).unwrap();
        assert_eq!(copy.id, copy_id);
        assert_ne!(copy.id, original);
        assert_eq!(copy.label, "Title Copy");
        assert_eq!(copy.name, "title_copy");
        assert!(copy.is_open);
        assert_eq!(labels(&store), vec!["Title", "Body", "Title Copy"]);
    }

    #[test]
    fn test_remove_and_ids_stay_stable() {
        let mut store = labelled(&["A", "B", "C"]);
        let c = store.get(2).unwrap().id;
        let removed = store.remove(0).unwrap();
        assert_eq!(removed.label, "A");
        assert_eq!(store.find_by_id(c), Some(1));
        assert_eq!(store.find_by_id(removed.id), None);
    }

    #[test]
    fn test_out_of_range_is_a_no_op() {
        let mut store = labelled(&["A"]);
        assert!(store.remove(3).is_none());
        assert!(!store.update(3, ControlPatch::new().with_label("x")));
        assert!(store.duplicate(3).is_none());
        assert!(!store.move_control(0, 3));
        assert!(!store.set_open(3, true));
        assert_eq!(store.len(), 1);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_revision_tracks_dirtying_mutations() {
        let mut store = labelled(&["A"]);
        let saved = store.revision();

        store.toggle_open(0);
        assert!(!store.update(3, ControlPatch::new().with_label("x")));
        assert_eq!(store.revision(), saved);

        store.update(0, ControlPatch::new().with_help("Shown below"));
        assert!(store.revision() > saved);

        let after_edit = store.revision();
        store.mark_clean();
        assert_eq!(store.revision(), after_edit);
    }

    #[test]
    fn test_toggle_open_keeps_list_clean() {
        let mut store = labelled(&["A"]);
        let open = store.get(0).unwrap().is_open;
        assert!(store.toggle_open(0));
        assert_eq!(store.get(0).unwrap().is_open, !open);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_option_operations() {
        let mut store = store();
        store.add("select");
        assert_eq!(store.add_option(0), Some(0));
        assert_eq!(store.add_option(0), Some(1));
        store.update_option(0, 0, ControlOption::new("a", "A"));
        store.update_option(0, 1, ControlOption::new("b", "B"));

        assert!(store.move_option_down(0, 0));
        let options = store.get(0).unwrap().options.as_ref().unwrap();
        let keys: Vec<_> = options.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);

        assert!(!store.move_option_up(0, 0));
        assert!(!store.move_option_down(0, 1));
        assert_eq!(store.remove_option(0, 0), Some(ControlOption::new("b", "B")));
        assert_eq!(store.get(0).unwrap().options.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_options_rejected_for_plain_types() {
        let mut store = store();
        store.add("text");
        assert_eq!(store.add_option(0), None);
        assert_eq!(store.get(0).unwrap().options, None);
    }

    #[test]
    fn test_drag_reorders_store() {
        let mut store = labelled(&["A", "B", "C"]);
        let mut drag = DragReorder::new();
        drag.press_handle(0);
        assert!(drag.begin_drag(0));
        assert_eq!(drag.hover(&mut store, 2, 110.0, ItemBounds::new(80.0, 120.0)), Some((0, 2)));
        assert_eq!(drag.drop_item(), Some(2));
        assert_eq!(labels(&store), vec!["B", "C", "A"]);
        assert!(store.is_dirty());
    }

    proptest! {
        #[test]
        fn move_preserves_other_order(
            len in 1usize..12,
            from_seed in any::<usize>(),
            to_seed in any::<usize>(),
        ) {
            let from = from_seed % len;
            let to = to_seed % len;
            let names: Vec<String> = (0..len).map(|i| format!("c{i}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let mut store = labelled(&refs);

            store.move_control(from, to);
            let after: Vec<String> = store.iter().map(|c| c.label.clone()).collect();

            prop_assert_eq!(after.len(), len);
            prop_assert_eq!(&after[to], &names[from]);

            let mut rest_before = names.clone();
            rest_before.remove(from);
            let mut rest_after = after.clone();
            rest_after.remove(to);
            prop_assert_eq!(rest_before, rest_after);
        }
    }
}
