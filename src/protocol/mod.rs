//! Protocol authenticators
//!
//! The two real `Authenticator` implementations: SSH over russh and a
//! minimal SMB2/NTLMv2 client.

pub mod smb;
pub mod ssh;

pub use smb::{SmbAuthenticator, DEFAULT_SMB_PORT};
pub use ssh::{SshAuthenticator, DEFAULT_SSH_PORT};
