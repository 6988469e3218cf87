//! Credential resolution
//!
//! Pure lookup from (host, protocol) to the credential the authenticator
//! should use. Shared mode keys on the host's category, per-host mode on the
//! exact address in the protocol's override map. A miss is reported to the
//! caller; the orchestrator records it as a failed result and moves on.

use crate::credentials::loader::{HostCredentials, SharedCredentials};
use crate::credentials::types::{Credential, CredentialMode};
use crate::error::CredentialError;
use crate::scope::Host;
use crate::validation::Protocol;

/// Read-only credential maps for one run
#[derive(Debug, Default)]
pub struct CredentialResolver {
    shared: SharedCredentials,
    per_host_ssh: HostCredentials,
    per_host_smb: HostCredentials,
}

impl CredentialResolver {
    pub fn new(
        shared: SharedCredentials,
        per_host_ssh: HostCredentials,
        per_host_smb: HostCredentials,
    ) -> Self {
        Self {
            shared,
            per_host_ssh,
            per_host_smb,
        }
    }

    pub fn from_shared(shared: SharedCredentials) -> Self {
        Self {
            shared,
            ..Default::default()
        }
    }

    pub fn from_per_host(per_host_ssh: HostCredentials, per_host_smb: HostCredentials) -> Self {
        Self {
            per_host_ssh,
            per_host_smb,
            ..Default::default()
        }
    }

    /// Resolve the credential for one (host, protocol) pair
    pub fn resolve(
        &self,
        host: &Host,
        protocol: Protocol,
        mode: CredentialMode,
    ) -> Result<&Credential, CredentialError> {
        match mode {
            CredentialMode::SharedPerCategory => self
                .shared
                .get(&host.category)
                .ok_or_else(|| CredentialError::MissingCredential(host.category.to_string())),
            CredentialMode::PerHostOverride => {
                let map = match protocol {
                    Protocol::Ssh => &self.per_host_ssh,
                    Protocol::Smb => &self.per_host_smb,
                };
                map.get(&host.address)
                    .ok_or_else(|| CredentialError::MissingCredential(host.address.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Category;

    fn resolver() -> CredentialResolver {
        let mut shared = SharedCredentials::new();
        shared.insert(
            Category::Linux,
            Credential::password("root", "toor", None),
        );

        let mut per_host_ssh = HostCredentials::new();
        per_host_ssh.insert(
            "10.0.0.1".to_string(),
            Credential::password("svc", "hunter2", None),
        );

        CredentialResolver::new(shared, per_host_ssh, HostCredentials::new())
    }

    #[test]
    fn test_shared_lookup_by_category() {
        let r = resolver();
        let host = Host::new("10.0.0.9", Category::Linux);
        let cred = r
            .resolve(&host, Protocol::Ssh, CredentialMode::SharedPerCategory)
            .unwrap();
        assert_eq!(cred.username, "root");
    }

    #[test]
    fn test_shared_lookup_missing_category() {
        let r = resolver();
        let host = Host::new("10.0.0.9", Category::Windows);
        let err = r
            .resolve(&host, Protocol::Smb, CredentialMode::SharedPerCategory)
            .unwrap_err();
        assert!(matches!(err, CredentialError::MissingCredential(_)));
    }

    #[test]
    fn test_per_host_lookup_by_address() {
        let r = resolver();
        let host = Host::new("10.0.0.1", Category::Linux);
        let cred = r
            .resolve(&host, Protocol::Ssh, CredentialMode::PerHostOverride)
            .unwrap();
        assert_eq!(cred.username, "svc");
    }

    #[test]
    fn test_per_host_lookup_is_per_protocol() {
        let r = resolver();
        let host = Host::new("10.0.0.1", Category::Other);
        // Address present in the SSH map only
        assert!(r
            .resolve(&host, Protocol::Ssh, CredentialMode::PerHostOverride)
            .is_ok());
        assert!(r
            .resolve(&host, Protocol::Smb, CredentialMode::PerHostOverride)
            .is_err());
    }
}
