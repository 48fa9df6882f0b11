//! Type registry: the lookup from a control's type key to its descriptor.
//!
//! A registry is built once when an editing session starts and is shared
//! read-only (`Arc<TypeRegistry>`) for the rest of the session. It is never
//! empty: an empty source yields a single text descriptor.
//!
//! The external source format is a JSON object keyed by type:
//!
//! ```json
//! { "range": { "label": "Range", "description": "...", "code": "...",
//!              "output": "...", "data_type": "number" } }
//! ```

mod dispatch;
mod kind;

pub use dispatch::{sanitize_variable_name, EditorWidget, ExtraFields, OptionRow};
pub use kind::ControlKind;

use blockkit_core::constants::FALLBACK_TYPE_KEY;
use blockkit_core::RegistryError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

use crate::model::ValueKind;

/// Rendering and behavior descriptor of one control type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDescriptor {
    pub key: String,
    pub label: String,
    pub description: String,
    /// Representation of the default value, and the derived attribute type.
    pub value_kind: ValueKind,
    /// Code snippet with a `{{name}}` placeholder for the variable name.
    pub code_template: String,
    /// Static example of what the generated code outputs.
    pub example_output: String,
}

/// Raw registry entry as supplied by the host.
#[derive(Debug, Deserialize)]
struct TypeSource {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    output: String,
    #[serde(default)]
    data_type: Option<String>,
}

impl TypeDescriptor {
    /// The text descriptor synthesized when a registry would otherwise be empty.
    pub fn fallback_text() -> Self {
        Self {
            key: FALLBACK_TYPE_KEY.to_string(),
            label: "Text".to_string(),
            description: "Single line of text".to_string(),
            value_kind: ValueKind::String,
            code_template: "<?php echo esc_html( $attributes['{{name}}'] ?? '' ); ?>".to_string(),
            example_output: "Hello world".to_string(),
        }
    }

    /// Text-like stand-in for an entry that could not be read.
    fn degraded(key: &str) -> Self {
        Self {
            key: key.to_string(),
            label: key.to_string(),
            description: String::new(),
            value_kind: ValueKind::String,
            code_template: String::new(),
            example_output: String::new(),
        }
    }

    fn from_source(key: &str, value: &Value) -> Self {
        let source: TypeSource = match serde_json::from_value(value.clone()) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Malformed type descriptor '{}', using text fallback: {}", key, e);
                return Self::degraded(key);
            }
        };

        let value_kind = match source.data_type.as_deref() {
            Some(data_type) => ValueKind::from_data_type(data_type).unwrap_or_else(|| {
                tracing::warn!(
                    "Type '{}' declares unknown data_type '{}', treating it as string",
                    key,
                    data_type
                );
                ValueKind::String
            }),
            None => ControlKind::from_key(key)
                .map(|k| k.natural_value_kind())
                .unwrap_or_default(),
        };

        Self {
            key: key.to_string(),
            label: source
                .label
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| key.to_string()),
            description: source.description,
            value_kind,
            code_template: source.code,
            example_output: source.output,
        }
    }

    fn builtin(
        kind: ControlKind,
        description: &str,
        code_template: &str,
        example_output: &str,
    ) -> Self {
        Self {
            key: kind.key().to_string(),
            label: kind.to_string(),
            description: description.to_string(),
            value_kind: kind.natural_value_kind(),
            code_template: code_template.to_string(),
            example_output: example_output.to_string(),
        }
    }
}

/// Immutable type key to descriptor lookup, in source order.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    descriptors: Vec<TypeDescriptor>,
    index: HashMap<String, usize>,
}

impl TypeRegistry {
    fn from_descriptors(mut descriptors: Vec<TypeDescriptor>) -> Self {
        if descriptors.is_empty() {
            tracing::warn!("Type registry source is empty, using the text fallback only");
            descriptors.push(TypeDescriptor::fallback_text());
        }
        let index = descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (d.key.clone(), i))
            .collect();
        Self { descriptors, index }
    }

    /// Build from an already-parsed source map. Never fails.
    pub fn from_source(source: &Map<String, Value>) -> Self {
        let descriptors = source
            .iter()
            .map(|(key, value)| TypeDescriptor::from_source(key, value))
            .collect();
        Self::from_descriptors(descriptors)
    }

    /// Parse a JSON source document.
    ///
    /// Only a document that is not a JSON object is an error; bad entries
    /// inside it degrade to text descriptors.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => Ok(Self::from_source(&map)),
            Value::Null => Ok(Self::from_descriptors(Vec::new())),
            other => Err(RegistryError::Malformed(format!(
                "expected an object keyed by type, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Load a JSON source document from disk.
    pub fn load_from_file(path: &Path) -> blockkit_core::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let registry = Self::from_json(&content)?;
        tracing::info!(
            "Loaded {} control types from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Registry with a descriptor for every [`ControlKind`].
    pub fn builtin() -> Self {
        let esc = |expr: &str| format!("<?php echo esc_html( {expr} ); ?>");
        Self::from_descriptors(vec![
            TypeDescriptor::fallback_text(),
            TypeDescriptor::builtin(
                ControlKind::Textarea,
                "Multiple lines of text",
                "<?php echo wp_kses_post( nl2br( $attributes['{{name}}'] ?? '' ) ); ?>",
                "First line<br />Second line",
            ),
            TypeDescriptor::builtin(
                ControlKind::Url,
                "A link target",
                "<?php echo esc_url( $attributes['{{name}}'] ?? '' ); ?>",
                "https://example.com/",
            ),
            TypeDescriptor::builtin(
                ControlKind::Color,
                "A color value",
                &esc("$attributes['{{name}}'] ?? ''"),
                "#1e73be",
            ),
            TypeDescriptor::builtin(
                ControlKind::Number,
                "A numeric value",
                &esc("(string) ( $attributes['{{name}}'] ?? 0 )"),
                "42",
            ),
            TypeDescriptor::builtin(
                ControlKind::Range,
                "A number picked from a bounded range",
                &esc("(string) ( $attributes['{{name}}'] ?? 0 )"),
                "5",
            ),
            TypeDescriptor::builtin(
                ControlKind::Toggle,
                "An on/off switch",
                "<?php if ( ! empty( $attributes['{{name}}'] ) ) : ?>...<?php endif; ?>",
                "true",
            ),
            TypeDescriptor::builtin(
                ControlKind::Select,
                "One choice from a dropdown",
                &esc("$attributes['{{name}}'] ?? ''"),
                "option_key",
            ),
            TypeDescriptor::builtin(
                ControlKind::Radio,
                "One choice from a set of radio buttons",
                &esc("$attributes['{{name}}'] ?? ''"),
                "option_key",
            ),
            TypeDescriptor::builtin(
                ControlKind::Image,
                "An image from the media library",
                "<?php echo wp_get_attachment_image( $attributes['{{name}}']['id'] ?? 0, 'full' ); ?>",
                "<img src=\"https://example.com/image.jpg\" alt=\"\" />",
            ),
        ])
    }

    pub fn get(&self, key: &str) -> Option<&TypeDescriptor> {
        self.index.get(key).map(|&i| &self.descriptors[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Descriptors in source order, for building the type selector.
    pub fn descriptors(&self) -> &[TypeDescriptor] {
        &self.descriptors
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|d| d.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Key preselected for a newly added control.
    pub fn default_type_key(&self) -> &str {
        &self.descriptors[0].key
    }

    /// Declared value kind of a type, falling back to its natural kind.
    pub fn value_kind(&self, key: &str) -> ValueKind {
        match self.get(key) {
            Some(descriptor) => descriptor.value_kind,
            None => ControlKind::from_key(key)
                .map(|k| k.natural_value_kind())
                .unwrap_or_default(),
        }
    }

    pub fn is_enumerable(&self, key: &str) -> bool {
        ControlKind::from_key(key).is_some_and(|k| k.is_enumerable())
    }

    /// Display label of a type, or the raw key when it is not registered.
    pub fn label_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map(|d| d.label.as_str()).unwrap_or(key)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
