//! SMB credential validation
//!
//! Minimal SMB2 client: NEGOTIATE, then a two-leg SESSION_SETUP carrying
//! raw NTLMSSP (NTLMv2), then TREE_CONNECT to the host's `IPC$` share as
//! proof of access; a transport-level accept alone is not treated as
//! success. The whole exchange runs inside one timeout window.

pub mod ntlm;
pub mod wire;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::debug;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::credentials::{Credential, Secret};
use crate::scope::Host;
use crate::validation::authenticator::{classify_io_error, Authenticator};
use crate::validation::results::{Outcome, Protocol, ValidationAttempt};

pub const DEFAULT_SMB_PORT: u16 = 445;

const WORKSTATION: &str = "CREDSWEEP";

pub struct SmbAuthenticator {
    port: u16,
}

impl SmbAuthenticator {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

impl Default for SmbAuthenticator {
    fn default() -> Self {
        Self::new(DEFAULT_SMB_PORT)
    }
}

#[async_trait]
impl Authenticator for SmbAuthenticator {
    fn protocol(&self) -> Protocol {
        Protocol::Smb
    }

    async fn attempt(
        &self,
        host: &Host,
        credential: &Credential,
        timeout: Duration,
    ) -> ValidationAttempt {
        let started = Instant::now();

        let password = match &credential.secret {
            Secret::Password(password) => password,
            Secret::KeyFile(_) => {
                return ValidationAttempt::new(
                    Outcome::KeyError,
                    "Key error: SMB authentication requires a password",
                    started.elapsed(),
                );
            }
        };

        let (outcome, detail) =
            match tokio::time::timeout(timeout, self.session(host, credential, password)).await {
                Ok(Ok(classified)) => classified,
                Ok(Err(e)) => classify_io_error(&e),
                Err(_) => (Outcome::Timeout, "Connection timed out".to_string()),
            };

        ValidationAttempt::new(outcome, detail, started.elapsed())
    }
}

impl SmbAuthenticator {
    /// Negotiate, authenticate, and tree-connect. I/O errors bubble out for
    /// transport classification; protocol-level verdicts come back directly.
    async fn session(
        &self,
        host: &Host,
        credential: &Credential,
        password: &str,
    ) -> std::io::Result<(Outcome, String)> {
        let mut stream = TcpStream::connect((host.address.as_str(), self.port)).await?;

        let client_guid: [u8; 16] = rand::random();
        let negotiate = wire::negotiate_request(0, client_guid);
        match exchange(&mut stream, &negotiate).await? {
            Ok(response) if response.status == wire::STATUS_SUCCESS => {
                debug!("{}: SMB dialect negotiated", host.address);
            }
            Ok(response) => return Ok(wire::classify_status(response.status)),
            Err(e) => return Ok((Outcome::UnknownError, format!("SMB error: {}", e))),
        }

        // Leg one: NTLMSSP NEGOTIATE, expect the server challenge back
        let setup = wire::session_setup_request(1, 0, &ntlm::negotiate_message());
        let response = match exchange(&mut stream, &setup).await? {
            Ok(response) => response,
            Err(e) => return Ok((Outcome::UnknownError, format!("SMB error: {}", e))),
        };
        if response.status != wire::STATUS_MORE_PROCESSING_REQUIRED {
            return Ok(wire::classify_status(response.status));
        }
        let challenge = match ntlm::parse_challenge(&response.security_token) {
            Ok(challenge) => challenge,
            Err(e) => return Ok((Outcome::UnknownError, format!("SMB error: {}", e))),
        };
        let session_id = response.session_id;

        // Leg two: NTLMv2 AUTHENTICATE under the session the server opened
        let domain = credential.domain.as_deref().unwrap_or("");
        let client_challenge: [u8; 8] = rand::random();
        let auth_token = ntlm::authenticate_message(
            &credential.username,
            domain,
            WORKSTATION,
            password,
            &challenge,
            &client_challenge,
            ntlm::filetime_now(),
        );
        let setup = wire::session_setup_request(2, session_id, &auth_token);
        let response = match exchange(&mut stream, &setup).await? {
            Ok(response) => response,
            Err(e) => return Ok((Outcome::UnknownError, format!("SMB error: {}", e))),
        };
        if response.status != wire::STATUS_SUCCESS {
            return Ok(wire::classify_status(response.status));
        }
        debug!("{}: SMB session established, verifying share access", host.address);

        // Proof of access: the IPC$ share every SMB server exposes
        let unc = format!(r"\\{}\IPC$", host.address);
        let tree = wire::tree_connect_request(3, session_id, &unc);
        match exchange(&mut stream, &tree).await? {
            Ok(response) => Ok(wire::classify_status(response.status)),
            Err(e) => Ok((Outcome::UnknownError, format!("SMB error: {}", e))),
        }
    }
}

/// Send one framed request and read one framed response
async fn exchange(
    stream: &mut TcpStream,
    message: &[u8],
) -> std::io::Result<Result<wire::Response, String>> {
    stream.write_all(&wire::frame(message)).await?;
    stream.flush().await?;

    let mut transport = [0u8; 4];
    stream.read_exact(&mut transport).await?;
    let len = u32::from_be_bytes([0, transport[1], transport[2], transport[3]]) as usize;
    if len == 0 || len > 0x00ff_ffff {
        return Ok(Err("Invalid SMB transport frame".to_string()));
    }

    let mut message = vec![0u8; len];
    stream.read_exact(&mut message).await?;
    Ok(wire::parse_response(&message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Category;

    #[tokio::test]
    async fn test_key_credential_rejected_without_network() {
        let authenticator = SmbAuthenticator::new(9);
        let host = Host::new("192.0.2.1", Category::Windows);
        let credential = Credential::key("admin", "/tmp/some.key");

        let attempt = authenticator
            .attempt(&host, &credential, Duration::from_millis(100))
            .await;

        assert_eq!(attempt.outcome, Outcome::KeyError);
    }

    #[tokio::test]
    async fn test_refused_port_classifies_as_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let authenticator = SmbAuthenticator::new(port);
        let host = Host::new("127.0.0.1", Category::Windows);
        let credential = Credential::password("admin", "secret", None);

        let attempt = authenticator
            .attempt(&host, &credential, Duration::from_secs(2))
            .await;

        assert_eq!(attempt.outcome, Outcome::ConnectionRefused);
    }

    #[tokio::test]
    async fn test_silent_listener_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let _held = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let authenticator = SmbAuthenticator::new(port);
        let host = Host::new("127.0.0.1", Category::Windows);
        let credential = Credential::password("admin", "secret", None);

        let attempt = authenticator
            .attempt(&host, &credential, Duration::from_millis(300))
            .await;

        assert_eq!(attempt.outcome, Outcome::Timeout);
    }

    #[tokio::test]
    async fn test_scripted_logon_failure_classifies_as_auth_failed() {
        // A fake server that negotiates, hands out a challenge, then
        // rejects the authentication with STATUS_LOGON_FAILURE.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            // Negotiate response: success, empty body beyond the fixed part
            read_frame(&mut stream).await;
            write_frame(&mut stream, &fake_response(wire::CMD_NEGOTIATE, wire::STATUS_SUCCESS, 0, &[])).await;

            // Session setup leg one: more processing + NTLM challenge
            read_frame(&mut stream).await;
            let challenge_token = fake_challenge_token();
            write_frame(
                &mut stream,
                &fake_session_setup_response(
                    wire::STATUS_MORE_PROCESSING_REQUIRED,
                    0x99,
                    &challenge_token,
                ),
            )
            .await;

            // Session setup leg two: logon failure
            read_frame(&mut stream).await;
            write_frame(
                &mut stream,
                &fake_session_setup_response(wire::STATUS_LOGON_FAILURE, 0x99, &[]),
            )
            .await;
        });

        let authenticator = SmbAuthenticator::new(port);
        let host = Host::new("127.0.0.1", Category::Windows);
        let credential = Credential::password("admin", "wrong", Some("CORP".into()));

        let attempt = authenticator
            .attempt(&host, &credential, Duration::from_secs(5))
            .await;

        assert_eq!(attempt.outcome, Outcome::AuthFailed);
        assert!(attempt.detail.contains("wrong credentials"));
    }

    #[tokio::test]
    async fn test_scripted_full_exchange_succeeds() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            read_frame(&mut stream).await;
            write_frame(&mut stream, &fake_response(wire::CMD_NEGOTIATE, wire::STATUS_SUCCESS, 0, &[])).await;

            read_frame(&mut stream).await;
            let challenge_token = fake_challenge_token();
            write_frame(
                &mut stream,
                &fake_session_setup_response(
                    wire::STATUS_MORE_PROCESSING_REQUIRED,
                    0x42,
                    &challenge_token,
                ),
            )
            .await;

            read_frame(&mut stream).await;
            write_frame(
                &mut stream,
                &fake_session_setup_response(wire::STATUS_SUCCESS, 0x42, &[]),
            )
            .await;

            // Tree connect accepted
            read_frame(&mut stream).await;
            write_frame(&mut stream, &fake_response(wire::CMD_TREE_CONNECT, wire::STATUS_SUCCESS, 0x42, &[])).await;
        });

        let authenticator = SmbAuthenticator::new(port);
        let host = Host::new("127.0.0.1", Category::Windows);
        let credential = Credential::password("admin", "correct", None);

        let attempt = authenticator
            .attempt(&host, &credential, Duration::from_secs(5))
            .await;

        assert_eq!(attempt.outcome, Outcome::Success);
    }

    async fn read_frame(stream: &mut tokio::net::TcpStream) {
        let mut transport = [0u8; 4];
        stream.read_exact(&mut transport).await.unwrap();
        let len = u32::from_be_bytes([0, transport[1], transport[2], transport[3]]) as usize;
        let mut message = vec![0u8; len];
        stream.read_exact(&mut message).await.unwrap();
    }

    async fn write_frame(stream: &mut tokio::net::TcpStream, message: &[u8]) {
        stream.write_all(&wire::frame(message)).await.unwrap();
        stream.flush().await.unwrap();
    }

    fn fake_response(command: u16, status: u32, session_id: u64, body: &[u8]) -> Vec<u8> {
        let mut msg = vec![0u8; wire::HEADER_LEN];
        msg[0..4].copy_from_slice(&[0xfe, b'S', b'M', b'B']);
        msg[4..6].copy_from_slice(&64u16.to_le_bytes());
        msg[8..12].copy_from_slice(&status.to_le_bytes());
        msg[12..14].copy_from_slice(&command.to_le_bytes());
        msg[40..48].copy_from_slice(&session_id.to_le_bytes());
        msg.extend_from_slice(body);
        msg
    }

    fn fake_session_setup_response(status: u32, session_id: u64, token: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&9u16.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&((wire::HEADER_LEN + 8) as u16).to_le_bytes());
        body.extend_from_slice(&(token.len() as u16).to_le_bytes());
        body.extend_from_slice(token);
        fake_response(wire::CMD_SESSION_SETUP, status, session_id, &body)
    }

    fn fake_challenge_token() -> Vec<u8> {
        let mut token = Vec::new();
        token.extend_from_slice(b"NTLMSSP\0");
        token.extend_from_slice(&2u32.to_le_bytes());
        token.extend_from_slice(&[0u8; 8]);
        token.extend_from_slice(&0u32.to_le_bytes());
        token.extend_from_slice(&[0x11; 8]); // server challenge
        token.extend_from_slice(&[0u8; 8]);
        token.extend_from_slice(&0u16.to_le_bytes()); // empty target info
        token.extend_from_slice(&0u16.to_le_bytes());
        token.extend_from_slice(&48u32.to_le_bytes());
        token
    }
}
