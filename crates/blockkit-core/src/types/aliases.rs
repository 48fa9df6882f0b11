//! Type aliases for commonly used shared-state types.
//!
//! The editing session is single-threaded and event-driven, so state that
//! several UI pieces observe is shared through `Rc<RefCell<T>>` rather than
//! locks.
//!
//! ```rust,ignore
//! use blockkit_core::types::*;
//!
//! let buffer: Shared<String> = shared(String::new());
//! buffer.borrow_mut().push_str("copied");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
pub type Shared<T> = Rc<RefCell<T>>;

/// An optional shared reference, for lazily-populated shared state.
pub type SharedOption<T> = Rc<RefCell<Option<T>>>;

/// Create a new `Shared<T>` from a value.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Create an empty `SharedOption<T>`.
pub fn shared_none<T>() -> SharedOption<T> {
    Rc::new(RefCell::new(None))
}
