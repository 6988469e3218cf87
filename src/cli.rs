//! Command line interface
//!
//! Authentication method, credential strategy, and timing knobs are resolved
//! once up front and handed to the orchestrator as plain configuration.
//! Anything not given on the command line falls back to `Settings`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::credentials::{AuthMethod, CredentialMode};

#[derive(Debug, Parser)]
#[command(
    name = "credsweep",
    about = "Pre-scan credential validator for SSH and SMB",
    version
)]
pub struct Args {
    /// Scope file (Linux:/Windows:/Others: sections)
    #[arg(long)]
    pub scope: Option<PathBuf>,

    /// Shared credentials file
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// CSV output file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// SSH authentication method
    #[arg(long, value_enum, default_value_t = AuthMethodArg::Password)]
    pub auth_method: AuthMethodArg,

    /// Credential strategy
    #[arg(long, value_enum, default_value_t = CredModeArg::Shared)]
    pub cred_mode: CredModeArg,

    /// Per-host SSH credentials file (per-host mode)
    #[arg(long)]
    pub ssh_creds: Option<PathBuf>,

    /// Per-host SMB credentials file (per-host mode)
    #[arg(long)]
    pub smb_creds: Option<PathBuf>,

    /// Directory of SSH private keys (key auth)
    #[arg(long)]
    pub key_dir: Option<PathBuf>,

    /// Per-attempt timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum concurrent attempts
    #[arg(long)]
    pub concurrency: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthMethodArg {
    Password,
    Key,
}

impl From<AuthMethodArg> for AuthMethod {
    fn from(arg: AuthMethodArg) -> Self {
        match arg {
            AuthMethodArg::Password => AuthMethod::Password,
            AuthMethodArg::Key => AuthMethod::Key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CredModeArg {
    Shared,
    PerHost,
}

impl From<CredModeArg> for CredentialMode {
    fn from(arg: CredModeArg) -> Self {
        match arg {
            CredModeArg::Shared => CredentialMode::SharedPerCategory,
            CredModeArg::PerHost => CredentialMode::PerHostOverride,
        }
    }
}
