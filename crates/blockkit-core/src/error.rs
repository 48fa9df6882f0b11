//! Error handling for BlockKit
//!
//! Provides the error types shared by the editing engine:
//! - Control errors (serializer input and save-time validation)
//! - Registry errors (type registry source parsing)
//!
//! All error types use `thiserror`; [`Error`] unifies them for public APIs.

use thiserror::Error;

/// Control list error type
///
/// Raised when a persisted control collection cannot be expanded, or when
/// the list fails the checks that run right before a save.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    /// The persisted collection was neither an array nor an object
    #[error("Invalid control collection: expected an array or an object, got {found}")]
    InvalidCollection {
        /// JSON type name of what was found instead.
        found: String,
    },

    /// A single persisted control body could not be read
    #[error("Invalid control '{name}': {reason}")]
    InvalidControl {
        /// The control's name (or its position when unnamed).
        name: String,
        /// Why the body was rejected.
        reason: String,
    },

    /// One or more controls failed save validation
    #[error("{message}")]
    Validation {
        /// Aggregated, user-visible message naming every offender.
        message: String,
        /// Index of the first offending control, for focusing.
        first_invalid: usize,
    },
}

/// Type registry error type
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry source was not a key-to-descriptor object
    #[error("Malformed type registry source: {0}")]
    Malformed(String),

    /// The registry source was not valid JSON
    #[error("Type registry JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main error type for BlockKit
#[derive(Error, Debug)]
pub enum Error {
    /// Control list error
    #[error(transparent)]
    Control(#[from] ControlError),

    /// Type registry error
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a save-time validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Control(ControlError::Validation { .. }))
    }

    /// Check if this is a registry error
    pub fn is_registry_error(&self) -> bool {
        matches!(self, Error::Registry(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_error_display() {
        let err = ControlError::InvalidCollection {
            found: "string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid control collection: expected an array or an object, got string"
        );

        let err = ControlError::InvalidControl {
            name: "heading".to_string(),
            reason: "body must be an object".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid control 'heading': body must be an object"
        );
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = ControlError::Validation {
            message: "Heading: name".to_string(),
            first_invalid: 2,
        };
        assert_eq!(err.to_string(), "Heading: name");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ControlError::Validation {
            message: "x".to_string(),
            first_invalid: 0,
        }
        .into();
        assert!(err.is_validation_error());
        assert!(!err.is_registry_error());

        let err: Error = RegistryError::Malformed("not an object".to_string()).into();
        assert!(err.is_registry_error());

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
