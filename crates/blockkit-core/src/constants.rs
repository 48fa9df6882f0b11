//! Shared constants.

/// Suffix appended to a duplicated control's label.
pub const COPY_LABEL_SUFFIX: &str = " Copy";

/// Suffix appended to a duplicated control's name.
pub const COPY_NAME_SUFFIX: &str = "_copy";

/// Type key used when a registry has nothing else to offer.
pub const FALLBACK_TYPE_KEY: &str = "text";

/// Placeholder replaced by the sanitized variable name in code templates.
pub const CODE_TEMPLATE_PLACEHOLDER: &str = "{{name}}";

/// Label shown in a control header while its label is still blank.
pub const UNTITLED_CONTROL_LABEL: &str = "(no label)";
