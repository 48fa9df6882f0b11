//! # BlockKit Core
//!
//! Core types, naming rules, and the error taxonomy shared by every BlockKit
//! crate. Nothing in here knows about type registries or persistence; it is
//! the leaf of the dependency graph.

pub mod constants;
pub mod error;
pub mod id;
pub mod naming;
pub mod types;

pub use error::{ControlError, Error, RegistryError, Result};
pub use id::ControlId;
pub use naming::{generate_control_name, is_valid_control_name, validate_control_name};
pub use types::{shared, shared_none, Shared, SharedOption};
