//! Validation result types
//!
//! `ValidationAttempt` is what one protocol handshake returns;
//! `ValidationResult` is the persisted record the reporter consumes.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::scope::{Category, Host};

/// Protocol used for one validation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Protocol {
    Ssh,
    Smb,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Ssh => write!(f, "SSH"),
            Protocol::Smb => write!(f, "SMB"),
        }
    }
}

/// Classified outcome of one authentication attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    AuthFailed,
    Timeout,
    ConnectionRefused,
    NetworkUnreachable,
    KeyError,
    UnknownError,
}

impl Outcome {
    /// Transient outcomes are worth retrying; a credential verdict is not.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Outcome::Timeout | Outcome::ConnectionRefused | Outcome::NetworkUnreachable
        )
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }

    /// CSV status column value
    pub fn status_label(self) -> &'static str {
        if self.is_success() { "Success" } else { "Failed" }
    }

    /// Console table glyph: ✓ success, ! missing credentials, ✗ otherwise
    pub fn glyph(self, detail: &str) -> &'static str {
        if self.is_success() {
            "✓"
        } else if detail == crate::validation::MISSING_CREDENTIALS_DETAIL {
            "!"
        } else {
            "✗"
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "Success"),
            Outcome::AuthFailed => write!(f, "Authentication failed"),
            Outcome::Timeout => write!(f, "Connection timed out"),
            Outcome::ConnectionRefused => write!(f, "Connection refused"),
            Outcome::NetworkUnreachable => write!(f, "Network unreachable"),
            Outcome::KeyError => write!(f, "Key error"),
            Outcome::UnknownError => write!(f, "Unknown error"),
        }
    }
}

/// Raw result of one protocol handshake, before it becomes a record
#[derive(Debug, Clone)]
pub struct ValidationAttempt {
    pub outcome: Outcome,
    pub detail: String,
    pub elapsed: Duration,
}

impl ValidationAttempt {
    pub fn new(outcome: Outcome, detail: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            outcome,
            detail: detail.into(),
            elapsed,
        }
    }

    pub fn success(elapsed: Duration) -> Self {
        Self::new(Outcome::Success, "Success", elapsed)
    }
}

/// One persisted record per attempted (host, protocol) pair
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub category: Category,
    pub address: String,
    pub protocol: Protocol,
    pub outcome: Outcome,
    pub detail: String,
    pub elapsed: Duration,
    pub timestamp: DateTime<Utc>,
}

impl ValidationResult {
    pub fn from_attempt(host: &Host, protocol: Protocol, attempt: ValidationAttempt) -> Self {
        Self {
            category: host.category,
            address: host.address.clone(),
            protocol,
            outcome: attempt.outcome,
            detail: attempt.detail,
            elapsed: attempt.elapsed,
            timestamp: Utc::now(),
        }
    }
}
