//! Credential model
//!
//! A credential is a username plus either a password or a reference to a
//! private key file, with an optional domain for SMB. The engine never
//! parses key material; it only needs the path to hand to the SSH layer.

use std::fmt;
use std::path::PathBuf;

/// The secret half of a credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Secret {
    Password(String),
    KeyFile(PathBuf),
}

/// One resolved credential for a (host, protocol) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub secret: Secret,
    pub domain: Option<String>,
}

impl Credential {
    pub fn password(
        username: impl Into<String>,
        password: impl Into<String>,
        domain: Option<String>,
    ) -> Self {
        Self {
            username: username.into(),
            secret: Secret::Password(password.into()),
            domain,
        }
    }

    pub fn key(username: impl Into<String>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            username: username.into(),
            secret: Secret::KeyFile(key_path.into()),
            domain: None,
        }
    }
}

/// How credentials are matched to hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMode {
    /// One credential applies to every host of a category
    SharedPerCategory,
    /// An override map supplies a distinct credential per address
    PerHostOverride,
}

impl fmt::Display for CredentialMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialMode::SharedPerCategory => write!(f, "shared"),
            CredentialMode::PerHostOverride => write!(f, "per-host"),
        }
    }
}

/// Which secret kind the SSH path authenticates with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Password,
    Key,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Password => write!(f, "password"),
            AuthMethod::Key => write!(f, "key"),
        }
    }
}
