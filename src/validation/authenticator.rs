//! Authenticator seam
//!
//! Both protocol clients implement this trait; the orchestrator only sees
//! the trait object, which is what makes the scheduling and retry logic
//! testable with mocks.

use std::io;
use std::time::Duration;

use async_trait::async_trait;

use crate::credentials::Credential;
use crate::scope::Host;
use crate::validation::results::{Outcome, Protocol, ValidationAttempt};

/// One protocol's authentication handshake
#[async_trait]
pub trait Authenticator: Send + Sync {
    fn protocol(&self) -> Protocol;

    /// Attempt a single authentication against `host` within `timeout`.
    /// Never errors: every failure mode is classified into the attempt's
    /// outcome so one host can never abort another's processing.
    async fn attempt(
        &self,
        host: &Host,
        credential: &Credential,
        timeout: Duration,
    ) -> ValidationAttempt;
}

/// Map a transport-level I/O error onto the outcome taxonomy
pub fn classify_io_error(error: &io::Error) -> (Outcome, String) {
    let outcome = match error.kind() {
        io::ErrorKind::ConnectionRefused => Outcome::ConnectionRefused,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Outcome::Timeout,
        io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable => {
            Outcome::NetworkUnreachable
        }
        _ => Outcome::UnknownError,
    };

    let detail = match outcome {
        Outcome::ConnectionRefused => "Connection refused".to_string(),
        Outcome::Timeout => "Connection timed out".to_string(),
        Outcome::NetworkUnreachable => format!("Network error: {}", error),
        _ => classify_message(&error.to_string()).1,
    };

    (outcome, detail)
}

/// Fallback classification for errors that only surface as text (russh and
/// the SMB layer both wrap OS errors this way on some paths)
pub fn classify_message(message: &str) -> (Outcome, String) {
    let lower = message.to_ascii_lowercase();
    if lower.contains("connection refused") {
        (Outcome::ConnectionRefused, "Connection refused".to_string())
    } else if lower.contains("timed out") || lower.contains("timeout") {
        (Outcome::Timeout, "Connection timed out".to_string())
    } else if lower.contains("unreachable") || lower.contains("no route to host") {
        (
            Outcome::NetworkUnreachable,
            format!("Network error: {}", message),
        )
    } else if lower.contains("access denied") || lower.contains("authentication") {
        (
            Outcome::AuthFailed,
            "Authentication failed (wrong credentials)".to_string(),
        )
    } else {
        (Outcome::UnknownError, format!("Error: {}", message))
    }
}
