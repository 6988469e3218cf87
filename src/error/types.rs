//! Error types
//!
//! Defines domain-specific error types for each module of the validator.
//! Only conditions that abort the whole run live here; per-host network
//! failures are classified `Outcome` values, not errors.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Scope file errors
#[derive(Debug)]
pub enum ScopeError {
    FileNotFound(PathBuf),
    IoError(PathBuf, io::Error),
    Empty(PathBuf),
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeError::FileNotFound(p) => write!(f, "Scope file not found: {}", p.display()),
            ScopeError::IoError(p, e) => {
                write!(f, "Failed to read scope file {}: {}", p.display(), e)
            }
            ScopeError::Empty(p) => write!(f, "Scope file {} contains no hosts", p.display()),
        }
    }
}

impl std::error::Error for ScopeError {}

/// Credential source errors
#[derive(Debug)]
pub enum CredentialError {
    FileNotFound(PathBuf),
    IoError(PathBuf, io::Error),
    KeyDirNotFound(PathBuf),
    MissingCredential(String),
    MalformedEntry { line: usize, content: String },
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::FileNotFound(p) => {
                write!(f, "Credentials file not found: {}", p.display())
            }
            CredentialError::IoError(p, e) => {
                write!(f, "Failed to read credentials file {}: {}", p.display(), e)
            }
            CredentialError::KeyDirNotFound(p) => {
                write!(f, "SSH key directory not found: {}", p.display())
            }
            CredentialError::MissingCredential(who) => {
                write!(f, "No credentials configured for {}", who)
            }
            CredentialError::MalformedEntry { line, content } => {
                write!(f, "Malformed credential entry at line {}: {}", line, content)
            }
        }
    }
}

impl std::error::Error for CredentialError {}

/// Report writing errors
#[derive(Debug)]
pub enum ReportError {
    CsvWrite(PathBuf, io::Error),
    Csv(csv::Error),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::CsvWrite(p, e) => {
                write!(f, "Failed to write results to {}: {}", p.display(), e)
            }
            ReportError::Csv(e) => write!(f, "CSV error: {}", e),
        }
    }
}

impl std::error::Error for ReportError {}

impl From<csv::Error> for ReportError {
    fn from(error: csv::Error) -> Self {
        ReportError::Csv(error)
    }
}

/// General validator error that encompasses all fatal error types
#[derive(Debug)]
pub enum ValidatorError {
    Scope(ScopeError),
    Credential(CredentialError),
    Report(ReportError),
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for ValidatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidatorError::Scope(e) => write!(f, "Scope error: {}", e),
            ValidatorError::Credential(e) => write!(f, "Credential error: {}", e),
            ValidatorError::Report(e) => write!(f, "Report error: {}", e),
            ValidatorError::Config(e) => write!(f, "Configuration error: {}", e),
            ValidatorError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ValidatorError {}

impl From<ScopeError> for ValidatorError {
    fn from(error: ScopeError) -> Self {
        ValidatorError::Scope(error)
    }
}

impl From<CredentialError> for ValidatorError {
    fn from(error: CredentialError) -> Self {
        ValidatorError::Credential(error)
    }
}

impl From<ReportError> for ValidatorError {
    fn from(error: ReportError) -> Self {
        ValidatorError::Report(error)
    }
}

impl From<config::ConfigError> for ValidatorError {
    fn from(error: config::ConfigError) -> Self {
        ValidatorError::Config(error)
    }
}

impl From<io::Error> for ValidatorError {
    fn from(error: io::Error) -> Self {
        ValidatorError::IoError(error)
    }
}
