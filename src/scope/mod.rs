//! Scope handling
//!
//! Target host model and the scope file loader.

pub mod host;
pub mod loader;

pub use host::{Category, Host};
pub use loader::{load_scope, parse_scope};
