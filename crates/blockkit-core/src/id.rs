//! Session-local control identity.

use std::fmt;
use uuid::Uuid;

/// Identity of a control for the lifetime of one editing session.
///
/// Generated once when a control is created or loaded, stable across
/// renames and reorders, and never written to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(Uuid);

impl ControlId {
    /// Generate a fresh identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ControlId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}
