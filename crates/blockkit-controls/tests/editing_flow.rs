//! Control list editing integration tests

use blockkit_controls::{
    to_keyed_mapping, to_ordered_list, validate_controls, ControlEditorPanel, ControlListStore,
    EditorWidget, ItemBounds, TypeRegistry,
};
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_load_edit_and_fold_back() {
    let registry = Arc::new(
        TypeRegistry::from_json(
            r#"{
                "text":  { "label": "Text", "code": "<?= ${{name}} ?>", "output": "Hi" },
                "range": { "label": "Range", "code": "<?= (int) ${{name}} ?>", "output": "5",
                           "data_type": "number" }
            }"#,
        )
        .unwrap(),
    );
    let persisted = json!({
        "heading": { "label": "Heading", "type": "text", "default": "Welcome" },
        "size": { "label": "Size", "type": "range", "default": 2, "min": 1, "max": 4 }
    });

    let controls = to_ordered_list(&persisted, &registry).unwrap();
    let mut store = ControlListStore::with_controls(Arc::clone(&registry), controls);
    let mut panel = ControlEditorPanel::new();

    let views = panel.render(&store);
    assert_eq!(views[0].code, "<?= $heading ?>");
    assert!(matches!(views[1].widget, EditorWidget::Range { value: Some(v), .. } if v == 2.0));

    // Drag "size" above "heading".
    panel.press_handle(1);
    assert!(panel.begin_drag(1));
    assert_eq!(
        panel.hover(&mut store, 0, 10.0, ItemBounds::new(0.0, 40.0)),
        Some((1, 0))
    );
    panel.pointer_released();

    panel.on_default_input(&mut store, 0, json!("4"));
    assert!(store.is_dirty());
    assert!(validate_controls(store.controls()).is_ok());

    let mapping = to_keyed_mapping(store.controls()).unwrap();
    let keys: Vec<_> = mapping.keys().cloned().collect();
    assert_eq!(keys, vec!["size", "heading"]);
    assert_eq!(mapping["size"]["default"], json!(4));
    assert_eq!(panel.block_code(&store), "<?= (int) $size ?>\n<?= $heading ?>");
}

#[test]
fn test_unknown_type_round_trips_as_text() {
    let registry = TypeRegistry::builtin();
    let persisted = json!({
        "gallery": { "label": "Gallery", "type": "gallery", "default": [1, 2], "columns": 3 }
    });

    let controls = to_ordered_list(&persisted, &registry).unwrap();
    assert!(matches!(
        registry.widget_for(&controls[0]),
        EditorWidget::Text { multiline: false, .. }
    ));
    assert_eq!(registry.code_for("gallery", "gallery"), "");

    let mapping = to_keyed_mapping(&controls).unwrap();
    assert_eq!(serde_json::Value::Object(mapping), persisted);
}
