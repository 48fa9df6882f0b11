//! Conversion between the editing-time ordered list and the persisted shape.
//!
//! Persisted controls are an object keyed by control name. Older data may
//! also be an array of bodies that carry their own `name`; both load into the
//! same ordered list, and saving always writes the keyed object.

use blockkit_core::{is_valid_control_name, ControlError, ControlId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::model::{coerce_number, BlockMetadata, BlockSettings, ControlDefinition, ControlList};
use crate::registry::{json_type_name, TypeRegistry};

/// Keys that only exist while editing and are never written back.
const UI_ONLY_KEYS: [&str; 3] = ["name", "isOpen", "id"];

/// Block settings in their persisted form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedBlockSettings {
    #[serde(flatten)]
    pub metadata: BlockMetadata,
    /// The keyed control mapping (or a legacy array of bodies).
    #[serde(default)]
    pub controls: Value,
}

/// Expand a persisted control collection into an ordered list.
///
/// Every control gets a fresh id, an attribute type derived from the
/// registry, a numeric default when its type is numeric, and starts
/// collapsed. A missing collection (`null`) is an empty list.
pub fn to_ordered_list(
    collection: &Value,
    registry: &TypeRegistry,
) -> Result<ControlList, ControlError> {
    let entries: Vec<(Option<&str>, &Value)> = match collection {
        Value::Null => return Ok(Vec::new()),
        Value::Array(bodies) => bodies.iter().map(|body| (None, body)).collect(),
        Value::Object(map) => map.iter().map(|(name, body)| (Some(name.as_str()), body)).collect(),
        other => {
            return Err(ControlError::InvalidCollection {
                found: json_type_name(other).to_string(),
            })
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(position, (key, body))| expand_control(position, key, body, registry))
        .collect()
}

fn expand_control(
    position: usize,
    key: Option<&str>,
    body: &Value,
    registry: &TypeRegistry,
) -> Result<ControlDefinition, ControlError> {
    let describe = || key.map_or_else(|| format!("#{}", position + 1), str::to_string);

    if !body.is_object() {
        return Err(ControlError::InvalidControl {
            name: describe(),
            reason: format!("expected an object, got {}", json_type_name(body)),
        });
    }
    let mut control: ControlDefinition =
        serde_json::from_value(body.clone()).map_err(|e| ControlError::InvalidControl {
            name: describe(),
            reason: e.to_string(),
        })?;

    if let Some(key) = key {
        control.name = key.to_string();
    }
    for ui_key in UI_ONLY_KEYS {
        control.extra.remove(ui_key);
    }
    control.id = ControlId::new();
    control.attribute_type = registry.value_kind(&control.control_type);
    if control.attribute_type.is_numeric() {
        control.default_value = control.default_value.map(coerce_number);
    }
    control.is_open = false;
    Ok(control)
}

/// Fold an ordered list into the persisted mapping keyed by trimmed name.
///
/// Controls with a blank name are skipped.
pub fn to_keyed_mapping(
    controls: &[ControlDefinition],
) -> Result<Map<String, Value>, ControlError> {
    let mut mapping = Map::new();
    for control in controls {
        let name = control.name.trim();
        if name.is_empty() {
            tracing::debug!("Skipping unnamed control {} on save", control.id);
            continue;
        }

        let mut body = match serde_json::to_value(control) {
            Ok(Value::Object(body)) => body,
            Ok(other) => {
                return Err(ControlError::InvalidControl {
                    name: name.to_string(),
                    reason: format!("serialized to {}", json_type_name(&other)),
                })
            }
            Err(e) => {
                return Err(ControlError::InvalidControl {
                    name: name.to_string(),
                    reason: e.to_string(),
                })
            }
        };
        for ui_key in UI_ONLY_KEYS {
            body.remove(ui_key);
        }
        mapping.insert(name.to_string(), Value::Object(body));
    }
    Ok(mapping)
}

/// Check the list right before a save.
///
/// Every control needs a label and a well-formed name, and names must be
/// unique once trimmed. All offenders are collected into one message of
/// `label-or-name: field, field` fragments.
pub fn validate_controls(controls: &[ControlDefinition]) -> Result<(), ControlError> {
    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for control in controls {
        let name = control.name.trim();
        if !name.is_empty() {
            *name_counts.entry(name).or_default() += 1;
        }
    }

    let mut fragments = Vec::new();
    let mut first_invalid = None;
    for (index, control) in controls.iter().enumerate() {
        let name = control.name.trim();
        let mut fields = Vec::new();

        if name.is_empty() || !is_valid_control_name(name) {
            fields.push("name");
        } else if name_counts.get(name).copied().unwrap_or_default() > 1 {
            fields.push("duplicate name");
        }
        if control.label.trim().is_empty() {
            fields.push("label");
        }

        if !fields.is_empty() {
            if first_invalid.is_none() {
                first_invalid = Some(index);
            }
            fragments.push(format!("{}: {}", control.display_label(), fields.join(", ")));
        }
    }

    match first_invalid {
        None => Ok(()),
        Some(first_invalid) => Err(ControlError::Validation {
            message: fragments.join("; "),
            first_invalid,
        }),
    }
}

impl BlockSettings {
    /// Load settings from their persisted form.
    pub fn from_persisted(
        persisted: PersistedBlockSettings,
        registry: &TypeRegistry,
    ) -> Result<Self, ControlError> {
        let controls = to_ordered_list(&persisted.controls, registry)?;
        Ok(Self {
            metadata: persisted.metadata,
            controls,
        })
    }

    /// Validate and fold into the persisted form.
    pub fn to_persisted(&self) -> Result<PersistedBlockSettings, ControlError> {
        validate_controls(&self.controls)?;
        Ok(PersistedBlockSettings {
            metadata: self.metadata.clone(),
            controls: Value::Object(to_keyed_mapping(&self.controls)?),
        })
    }
}
