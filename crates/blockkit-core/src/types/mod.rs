//! Type aliases for shared single-threaded state.
//!
//! - [`aliases`]: `Rc<RefCell<T>>` aliases and constructor helpers.

pub mod aliases;

pub use aliases::*;
