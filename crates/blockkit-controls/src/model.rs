//! Data model for block controls.
//!
//! A [`ControlDefinition`] is one typed, user-configurable field of a block.
//! Definitions serialize to the persisted control body: the UI-only fields
//! (`id`, `isOpen`, the derived attribute type) are never written, and any
//! unknown persisted fields are carried through untouched.

use blockkit_core::constants::UNTITLED_CONTROL_LABEL;
use blockkit_core::ControlId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use crate::registry::ControlKind;

/// Representation kind of a control's default value.
///
/// Doubles as the block attribute type derived for each control on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl ValueKind {
    /// Parse a `data_type` string from a registry source.
    pub fn from_data_type(data_type: &str) -> Option<Self> {
        match data_type.trim().to_ascii_lowercase().as_str() {
            "string" => Some(Self::String),
            "number" | "integer" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number)
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Object => write!(f, "object"),
            Self::Array => write!(f, "array"),
        }
    }
}

/// One `{key, value}` choice of an enumerable control.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlOption {
    pub key: String,
    pub value: String,
}

impl ControlOption {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A selected media asset, as returned by the asset picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub id: u64,
    pub url: String,
}

impl AssetRef {
    /// Read an asset back out of a stored default value.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({ "id": self.id, "url": self.url })
    }
}

/// A single configurable field attached to a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlDefinition {
    /// Session-local identity; regenerated on every load.
    #[serde(skip)]
    pub id: ControlId,
    /// Persisted key. Validated only at save time.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default = "default_control_type")]
    pub control_type: String,
    #[serde(
        rename = "default",
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<ControlOption>>,
    #[serde(
        default,
        deserialize_with = "deserialize_bound",
        skip_serializing_if = "Option::is_none"
    )]
    pub min: Option<Number>,
    #[serde(
        default,
        deserialize_with = "deserialize_bound",
        skip_serializing_if = "Option::is_none"
    )]
    pub max: Option<Number>,
    #[serde(
        default,
        deserialize_with = "deserialize_bound",
        skip_serializing_if = "Option::is_none"
    )]
    pub step: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Attribute type derived from the registry when the list is loaded.
    #[serde(skip)]
    pub attribute_type: ValueKind,
    #[serde(skip)]
    pub is_open: bool,
    /// Persisted fields this editor does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_control_type() -> String {
    blockkit_core::constants::FALLBACK_TYPE_KEY.to_string()
}

/// Keeps an explicit `null` distinct from an absent field.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Reads a range bound the way a numeric default is read; blank means unset.
fn deserialize_bound<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        other => match coerce_number(other) {
            Value::Number(n) => Some(n),
            _ => None,
        },
    })
}

impl ControlDefinition {
    /// A blank, expanded control of the given type.
    pub fn new(control_type: impl Into<String>) -> Self {
        Self {
            id: ControlId::new(),
            name: String::new(),
            label: String::new(),
            control_type: control_type.into(),
            default_value: None,
            options: None,
            min: None,
            max: None,
            step: None,
            help: None,
            attribute_type: ValueKind::default(),
            is_open: true,
            extra: Map::new(),
        }
    }

    /// Known kind of this control's type key, if any.
    pub fn kind(&self) -> Option<ControlKind> {
        ControlKind::from_key(&self.control_type)
    }

    /// Text for the collapsed header: label, then name, then a placeholder.
    pub fn display_label(&self) -> &str {
        if !self.label.trim().is_empty() {
            self.label.trim()
        } else if !self.name.trim().is_empty() {
            self.name.trim()
        } else {
            UNTITLED_CONTROL_LABEL
        }
    }

    /// Currently selected asset for structured controls.
    pub fn asset(&self) -> Option<AssetRef> {
        self.default_value.as_ref().and_then(AssetRef::from_value)
    }
}

/// Ordered sequence of controls; order is render and code-generation order.
pub type ControlList = Vec<ControlDefinition>;

/// Shallow patch applied by [`crate::ControlListStore::update`].
///
/// Only the fields that are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlPatch {
    pub label: Option<String>,
    pub name: Option<String>,
    pub control_type: Option<String>,
    pub default_value: Option<Value>,
    pub options: Option<Vec<ControlOption>>,
    pub min: Option<Number>,
    pub max: Option<Number>,
    pub step: Option<Number>,
    pub help: Option<String>,
    pub is_open: Option<bool>,
}

impl ControlPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_type(mut self, control_type: impl Into<String>) -> Self {
        self.control_type = Some(control_type.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_options(mut self, options: Vec<ControlOption>) -> Self {
        self.options = Some(options);
        self
    }

    /// Range bounds; non-finite values are ignored.
    pub fn with_bounds(mut self, min: f64, max: f64, step: f64) -> Self {
        self.min = number_from_f64(min);
        self.max = number_from_f64(max);
        self.step = number_from_f64(step);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_open(mut self, is_open: bool) -> Self {
        self.is_open = Some(is_open);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Convert to a JSON number, keeping integral values as integers.
pub fn number_from_f64(value: f64) -> Option<Number> {
    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

/// Coerce a default value to a number the way a numeric field reads it.
///
/// Numeric strings parse, blank strings and `null` read as `0`, booleans as
/// `0`/`1`. Anything else has no numeric reading and becomes `null`.
pub fn coerce_number(value: Value) -> Value {
    match value {
        Value::Number(_) => value,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Value::from(0);
            }
            if let Ok(n) = trimmed.parse::<i64>() {
                return Value::from(n);
            }
            match trimmed.parse::<f64>().ok().and_then(number_from_f64) {
                Some(n) => Value::Number(n),
                None => {
                    tracing::warn!("Default value {:?} is not numeric, clearing it", s);
                    Value::Null
                }
            }
        }
        Value::Bool(b) => Value::from(u8::from(b)),
        Value::Null => Value::from(0),
        Value::Array(_) | Value::Object(_) => {
            tracing::warn!("Structured default value has no numeric reading, clearing it");
            Value::Null
        }
    }
}

/// A named style variant offered by the block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleVariant {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Block-level metadata: everything in the settings except the controls.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockMetadata {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub keywords: Vec<String>,
    /// Feature-support flags, e.g. `align`, `anchor`, `customClassName`.
    pub supports: BTreeMap<String, bool>,
    pub styles: Vec<StyleVariant>,
}

impl BlockMetadata {
    /// Add a style variant. Returns false if the name is already taken.
    pub fn add_style(&mut self, name: impl Into<String>, label: impl Into<String>) -> bool {
        let name = name.into();
        if self.styles.iter().any(|s| s.name == name) {
            return false;
        }
        self.styles.push(StyleVariant {
            name,
            label: label.into(),
            is_default: false,
        });
        true
    }

    pub fn remove_style(&mut self, name: &str) -> bool {
        let before = self.styles.len();
        self.styles.retain(|s| s.name != name);
        self.styles.len() != before
    }

    /// Make `name` the only default style.
    pub fn set_default_style(&mut self, name: &str) -> bool {
        if !self.styles.iter().any(|s| s.name == name) {
            return false;
        }
        for style in &mut self.styles {
            style.is_default = style.name == name;
        }
        true
    }

    pub fn default_style(&self) -> Option<&StyleVariant> {
        self.styles.iter().find(|s| s.is_default)
    }

    pub fn set_support(&mut self, feature: impl Into<String>, enabled: bool) {
        self.supports.insert(feature.into(), enabled);
    }
}

/// The full settings aggregate for one block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockSettings {
    pub metadata: BlockMetadata,
    pub controls: ControlList,
}

impl BlockSettings {
    /// Default-initialized settings for a brand new block.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            metadata: BlockMetadata {
                title: title.into(),
                ..BlockMetadata::default()
            },
            controls: Vec::new(),
        }
    }
}
