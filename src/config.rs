//! Configuration management
//!
//! Tunables loaded once before a run: target ports, the per-attempt timeout,
//! concurrency and retry bounds, and default file locations. Values come
//! from an optional `credsweep.toml` with `CREDSWEEP_*` environment
//! overrides on top of built-in defaults.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    /// SSH port probed for Linux/Others hosts
    pub ssh_port: u16,

    /// SMB port probed for Windows/Others hosts
    pub smb_port: u16,

    /// Per-attempt timeout covering connect plus authentication
    pub timeout_secs: u64,

    /// Maximum in-flight authentication attempts
    pub max_concurrency: usize,

    /// Extra attempts after a transient failure
    pub retry_limit: u32,

    /// Default input/output locations, overridable from the CLI
    pub scope_file: PathBuf,
    pub credentials_file: PathBuf,
    pub results_file: PathBuf,
    pub ssh_creds_file: PathBuf,
    pub smb_creds_file: PathBuf,
    pub key_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ssh_port: 22,
            smb_port: 445,
            timeout_secs: 5,
            max_concurrency: 10,
            retry_limit: 1,
            scope_file: PathBuf::from("scope.txt"),
            credentials_file: PathBuf::from("credentials.txt"),
            results_file: PathBuf::from("validation_results.csv"),
            ssh_creds_file: PathBuf::from("ssh_creds.txt"),
            smb_creds_file: PathBuf::from("smb_creds.txt"),
            key_dir: PathBuf::from("keys"),
        }
    }
}

impl Settings {
    /// Load settings; a missing credsweep.toml falls back to defaults
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::with_name("credsweep").required(false))
            .add_source(Environment::with_prefix("CREDSWEEP"))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.ssh_port == 0 || self.smb_port == 0 {
            return Err(config::ConfigError::Message(
                "Ports cannot be 0".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(config::ConfigError::Message(
                "max_concurrency must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Per-attempt timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.timeout(), Duration::from_secs(5));
        assert_eq!(settings.ssh_port, 22);
        assert_eq!(settings.smb_port, 445);
    }

    #[test]
    fn test_zero_values_rejected() {
        let settings = Settings {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            max_concurrency: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
