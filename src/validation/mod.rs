//! Validation engine
//!
//! Orchestrates credential validation attempts across the scope and
//! collects typed results.

pub mod aggregator;
pub mod authenticator;
pub mod orchestrator;
pub mod results;

pub use aggregator::ResultAggregator;
pub use authenticator::{classify_io_error, classify_message, Authenticator};
pub use orchestrator::{protocols_for, CancelToken, Orchestrator, ValidationPlan};
pub use results::{Outcome, Protocol, ValidationAttempt, ValidationResult};

/// Detail string recorded when credential resolution fails for a pair
pub const MISSING_CREDENTIALS_DETAIL: &str = "Missing credentials";
