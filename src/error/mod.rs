//! Error handling
//!
//! Defines the fatal error types for the validator.

pub mod types;

pub use types::*;
