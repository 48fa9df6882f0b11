//! Closed set of control types the editor knows how to render.

use crate::model::ValueKind;

/// A control type the editor has a dedicated widget for.
///
/// Type keys outside this set are still valid registry entries; they are
/// edited with the plain text fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Text,
    Textarea,
    Url,
    Color,
    Number,
    Range,
    Toggle,
    Select,
    Radio,
    Image,
}

impl ControlKind {
    /// Get all control kinds
    pub fn all() -> &'static [ControlKind] {
        &[
            ControlKind::Text,
            ControlKind::Textarea,
            ControlKind::Url,
            ControlKind::Color,
            ControlKind::Number,
            ControlKind::Range,
            ControlKind::Toggle,
            ControlKind::Select,
            ControlKind::Radio,
            ControlKind::Image,
        ]
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "text" => Some(Self::Text),
            "textarea" => Some(Self::Textarea),
            "url" => Some(Self::Url),
            "color" => Some(Self::Color),
            "number" => Some(Self::Number),
            "range" => Some(Self::Range),
            "toggle" => Some(Self::Toggle),
            "select" => Some(Self::Select),
            "radio" => Some(Self::Radio),
            "image" => Some(Self::Image),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Url => "url",
            Self::Color => "color",
            Self::Number => "number",
            Self::Range => "range",
            Self::Toggle => "toggle",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Image => "image",
        }
    }

    /// Value kind used when the registry does not declare one.
    pub fn natural_value_kind(&self) -> ValueKind {
        match self {
            Self::Text | Self::Textarea | Self::Url | Self::Color => ValueKind::String,
            Self::Select | Self::Radio => ValueKind::String,
            Self::Number | Self::Range => ValueKind::Number,
            Self::Toggle => ValueKind::Boolean,
            Self::Image => ValueKind::Object,
        }
    }

    /// Whether controls of this kind carry a `{key, value}` option list.
    pub fn is_enumerable(&self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }
}

impl std::fmt::Display for ControlKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "Text"),
            Self::Textarea => write!(f, "Textarea"),
            Self::Url => write!(f, "URL"),
            Self::Color => write!(f, "Color"),
            Self::Number => write!(f, "Number"),
            Self::Range => write!(f, "Range"),
            Self::Toggle => write!(f, "Toggle"),
            Self::Select => write!(f, "Select"),
            Self::Radio => write!(f, "Radio"),
            Self::Image => write!(f, "Image"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for kind in ControlKind::all() {
            assert_eq!(ControlKind::from_key(kind.key()), Some(*kind));
        }
        assert_eq!(ControlKind::from_key("gallery"), None);
        assert_eq!(ControlKind::from_key("Text"), None);
    }

    #[test]
    fn test_enumerable_kinds() {
        let enumerable: Vec<_> = ControlKind::all()
            .iter()
            .filter(|k| k.is_enumerable())
            .collect();
        assert_eq!(enumerable, vec![&ControlKind::Select, &ControlKind::Radio]);
    }
}
