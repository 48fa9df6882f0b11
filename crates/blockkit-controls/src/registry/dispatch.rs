//! Type-driven dispatch: widget, extra fields, generated code, example output.

use blockkit_core::constants::CODE_TEMPLATE_PLACEHOLDER;
use serde_json::{Number, Value};

use super::{ControlKind, TypeRegistry};
use crate::model::{AssetRef, ControlDefinition, ControlOption};

/// Input widget used to edit a control's default value.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorWidget {
    Toggle {
        checked: bool,
    },
    Number {
        value: Option<f64>,
    },
    Range {
        value: Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    },
    /// Single choice built from the control's options; also used for radios.
    Select {
        options: Vec<ControlOption>,
        selected: Option<String>,
    },
    Text {
        value: String,
        multiline: bool,
    },
    /// Trigger for the external asset picker.
    AssetPicker {
        asset: Option<AssetRef>,
    },
}

/// Type-specific fields edited alongside the default value.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtraFields {
    None,
    RangeBounds {
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    },
    OptionList {
        rows: Vec<OptionRow>,
    },
}

/// One editable row of an option list.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionRow {
    pub index: usize,
    pub key: String,
    pub value: String,
    pub can_move_up: bool,
    pub can_move_down: bool,
}

fn as_f64(number: &Option<Number>) -> Option<f64> {
    number.as_ref().and_then(Number::as_f64)
}

fn value_as_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Lowercase `name` and collapse every run of non-alphanumerics into one `_`.
pub fn sanitize_variable_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

impl TypeRegistry {
    /// Widget for editing `control`'s default value.
    pub fn widget_for(&self, control: &ControlDefinition) -> EditorWidget {
        let value = control.default_value.as_ref();
        let Some(kind) = control.kind() else {
            return EditorWidget::Text {
                value: value_as_text(value),
                multiline: false,
            };
        };

        match kind {
            ControlKind::Toggle => EditorWidget::Toggle {
                checked: match value {
                    Some(Value::Bool(b)) => *b,
                    Some(Value::String(s)) => s == "true",
                    Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
                    _ => false,
                },
            },
            ControlKind::Number => EditorWidget::Number {
                value: value_as_f64(value),
            },
            ControlKind::Range => EditorWidget::Range {
                value: value_as_f64(value),
                min: as_f64(&control.min),
                max: as_f64(&control.max),
                step: as_f64(&control.step),
            },
            ControlKind::Select | ControlKind::Radio => EditorWidget::Select {
                options: control.options.clone().unwrap_or_default(),
                selected: match value {
                    Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                    _ => None,
                },
            },
            ControlKind::Text | ControlKind::Url | ControlKind::Color => EditorWidget::Text {
                value: value_as_text(value),
                multiline: false,
            },
            ControlKind::Textarea => EditorWidget::Text {
                value: value_as_text(value),
                multiline: true,
            },
            ControlKind::Image => EditorWidget::AssetPicker {
                asset: control.asset(),
            },
        }
    }

    /// Extra per-type fields editor for `control`.
    pub fn extra_fields_for(&self, control: &ControlDefinition) -> ExtraFields {
        match control.kind() {
            Some(ControlKind::Range) => ExtraFields::RangeBounds {
                min: as_f64(&control.min),
                max: as_f64(&control.max),
                step: as_f64(&control.step),
            },
            Some(kind) if kind.is_enumerable() => {
                let options = control.options.as_deref().unwrap_or_default();
                let last = options.len().saturating_sub(1);
                ExtraFields::OptionList {
                    rows: options
                        .iter()
                        .enumerate()
                        .map(|(index, option)| OptionRow {
                            index,
                            key: option.key.clone(),
                            value: option.value.clone(),
                            can_move_up: index > 0,
                            can_move_down: index < last,
                        })
                        .collect(),
                }
            }
            _ => ExtraFields::None,
        }
    }

    /// Code snippet for a control of `type_key` bound to `variable_name`.
    ///
    /// Unknown types and descriptors without a template produce an empty
    /// string.
    pub fn code_for(&self, type_key: &str, variable_name: &str) -> String {
        let Some(descriptor) = self.get(type_key) else {
            tracing::warn!("No type descriptor for '{}', no code generated", type_key);
            return String::new();
        };
        if descriptor.code_template.trim().is_empty() {
            tracing::warn!("Type '{}' has no code template", type_key);
            return String::new();
        }
        descriptor.code_template.replace(
            CODE_TEMPLATE_PLACEHOLDER,
            &sanitize_variable_name(variable_name),
        )
    }

    /// Static example output of `type_key`, verbatim.
    pub fn example_for(&self, type_key: &str) -> &str {
        self.get(type_key)
            .map(|d| d.example_output.as_str())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn control(kind: &str, default: Option<Value>) -> ControlDefinition {
        let mut control = ControlDefinition::new(kind);
        control.default_value = default;
        control
    }

    #[test]
    fn test_sanitize_variable_name() {
        assert_eq!(sanitize_variable_name("Hero Title"), "hero_title");
        assert_eq!(sanitize_variable_name("a -- b"), "a_b");
        assert_eq!(sanitize_variable_name("x!!"), "x_");
        assert_eq!(sanitize_variable_name("already_ok"), "already_ok");
    }

    #[test]
    fn test_widget_dispatch() {
        let registry = TypeRegistry::builtin();

        assert_eq!(
            registry.widget_for(&control("toggle", Some(json!(true)))),
            EditorWidget::Toggle { checked: true }
        );
        assert_eq!(
            registry.widget_for(&control("number", Some(json!("3")))),
            EditorWidget::Number { value: Some(3.0) }
        );
        assert_eq!(
            registry.widget_for(&control("textarea", None)),
            EditorWidget::Text {
                value: String::new(),
                multiline: true
            }
        );
        assert_eq!(
            registry.widget_for(&control("image", Some(Value::Null))),
            EditorWidget::AssetPicker { asset: None }
        );
    }

    #[test]
    fn test_range_widget_carries_bounds() {
        let registry = TypeRegistry::builtin();
        let mut range = control("range", Some(json!(5)));
        range.min = Some(Number::from(0));
        range.max = Some(Number::from(10));
        range.step = Number::from_f64(0.5);

        assert_eq!(
            registry.widget_for(&range),
            EditorWidget::Range {
                value: Some(5.0),
                min: Some(0.0),
                max: Some(10.0),
                step: Some(0.5)
            }
        );
        assert_eq!(
            registry.extra_fields_for(&range),
            ExtraFields::RangeBounds {
                min: Some(0.0),
                max: Some(10.0),
                step: Some(0.5)
            }
        );
    }

    #[test]
    fn test_select_uses_options() {
        let registry = TypeRegistry::builtin();
        let mut select = control("select", Some(json!("b")));
        select.options = Some(vec![ControlOption::new("a", "A"), ControlOption::new("b", "B")]);

        match registry.widget_for(&select) {
            EditorWidget::Select { options, selected } => {
                assert_eq!(options.len(), 2);
                assert_eq!(selected.as_deref(), Some("b"));
            }
            other => panic!("unexpected widget {:?}", other),
        }

        match registry.extra_fields_for(&select) {
            ExtraFields::OptionList { rows } => {
                assert!(!rows[0].can_move_up && rows[0].can_move_down);
                assert!(rows[1].can_move_up && !rows[1].can_move_down);
            }
            other => panic!("unexpected extra fields {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_falls_back_to_text() {
        let registry = TypeRegistry::builtin();
        assert_eq!(
            registry.widget_for(&control("gallery", Some(json!(12)))),
            EditorWidget::Text {
                value: "12".to_string(),
                multiline: false
            }
        );
        assert_eq!(
            registry.extra_fields_for(&control("gallery", None)),
            ExtraFields::None
        );
    }

    #[test]
    fn test_code_for_substitutes_sanitized_name() {
        let registry = TypeRegistry::from_json(r#"{ "text": { "code": "echo ${{name}};" } }"#)
            .unwrap();
        assert_eq!(registry.code_for("text", "Hero Title"), "echo $hero_title;");
    }

    #[test]
    fn test_code_for_missing_descriptor_is_empty() {
        let registry = TypeRegistry::from_json(r#"{ "text": { "label": "Text" } }"#).unwrap();
        assert_eq!(registry.code_for("text", "title"), "");
        assert_eq!(registry.code_for("nope", "title"), "");
    }

    #[test]
    fn test_example_output_is_verbatim() {
        let registry = TypeRegistry::builtin();
        assert_eq!(registry.example_for("url"), "https://example.com/");
        assert_eq!(registry.example_for("nope"), "");
    }
}
