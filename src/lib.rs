pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod protocol;
pub mod report;
pub mod scope;
pub mod validation;

pub use validation::{CancelToken, Orchestrator, ValidationPlan};
