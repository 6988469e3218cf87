//! SSH credential validation
//!
//! Authentication-only russh client: open the transport, run password or
//! key auth, and close the session as soon as the server accepts. No
//! command execution. Connect + handshake + auth share one timeout window.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::debug;
use russh::client;
use russh_keys::key;
use tokio::net::TcpStream;

use crate::credentials::{Credential, Secret};
use crate::scope::Host;
use crate::validation::authenticator::{classify_io_error, classify_message, Authenticator};
use crate::validation::results::{Outcome, Protocol, ValidationAttempt};

pub const DEFAULT_SSH_PORT: u16 = 22;

pub struct SshAuthenticator {
    port: u16,
}

impl SshAuthenticator {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

impl Default for SshAuthenticator {
    fn default() -> Self {
        Self::new(DEFAULT_SSH_PORT)
    }
}

/// Pre-scan validation talks to hosts it has never seen, so the server key
/// is accepted the way `StrictHostKeyChecking=no` would.
struct AcceptServerKey;

#[async_trait]
impl client::Handler for AcceptServerKey {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &key::PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

#[async_trait]
impl Authenticator for SshAuthenticator {
    fn protocol(&self) -> Protocol {
        Protocol::Ssh
    }

    async fn attempt(
        &self,
        host: &Host,
        credential: &Credential,
        timeout: Duration,
    ) -> ValidationAttempt {
        let started = Instant::now();

        // An unusable key is a configuration verdict; classify before any
        // network I/O happens.
        let key_pair = match &credential.secret {
            Secret::KeyFile(path) => match russh_keys::load_secret_key(path, None) {
                Ok(key_pair) => Some(Arc::new(key_pair)),
                Err(e) => {
                    return ValidationAttempt::new(
                        Outcome::KeyError,
                        format!("Key error: {}", e),
                        started.elapsed(),
                    );
                }
            },
            Secret::Password(_) => None,
        };

        let (outcome, detail) =
            match tokio::time::timeout(timeout, self.handshake(host, credential, key_pair)).await
            {
                Ok(classified) => classified,
                Err(_) => (Outcome::Timeout, "Connection timed out".to_string()),
            };

        ValidationAttempt::new(outcome, detail, started.elapsed())
    }
}

impl SshAuthenticator {
    async fn handshake(
        &self,
        host: &Host,
        credential: &Credential,
        key_pair: Option<Arc<key::KeyPair>>,
    ) -> (Outcome, String) {
        // Connect the TCP layer ourselves so refusal/unreachable classify
        // from the io::ErrorKind instead of a wrapped protocol error.
        let stream = match TcpStream::connect((host.address.as_str(), self.port)).await {
            Ok(stream) => stream,
            Err(e) => return classify_io_error(&e),
        };

        let config = Arc::new(client::Config::default());
        let mut session =
            match client::connect_stream(config, stream, AcceptServerKey).await {
                Ok(session) => session,
                Err(e) => return classify_ssh_error(e),
            };

        let authenticated = match (&credential.secret, key_pair) {
            (Secret::Password(password), _) => {
                session
                    .authenticate_password(&credential.username, password)
                    .await
            }
            (Secret::KeyFile(_), Some(key_pair)) => {
                session
                    .authenticate_publickey(&credential.username, key_pair)
                    .await
            }
            // attempt() loaded the key already; this arm cannot carry None
            (Secret::KeyFile(path), None) => {
                return (
                    Outcome::KeyError,
                    format!("Key error: {} not loaded", path.display()),
                );
            }
        };

        match authenticated {
            Ok(true) => {
                debug!("{}: SSH handshake accepted, closing session", host.address);
                let _ = session
                    .disconnect(russh::Disconnect::ByApplication, "validation complete", "en")
                    .await;
                (Outcome::Success, "Success".to_string())
            }
            Ok(false) => (
                Outcome::AuthFailed,
                "Authentication failed (wrong credentials)".to_string(),
            ),
            Err(e) => classify_ssh_error(e),
        }
    }
}

fn classify_ssh_error(error: russh::Error) -> (Outcome, String) {
    let (outcome, detail) = classify_message(&error.to_string());
    match outcome {
        // Anything unclassified from russh is still an SSH-layer failure
        Outcome::UnknownError => (outcome, format!("SSH error: {}", error)),
        _ => (outcome, detail),
    }
}
