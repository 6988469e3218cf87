//! Credential handling
//!
//! Credential model, file loaders, and the (host, protocol) -> credential
//! resolver.

pub mod loader;
pub mod resolver;
pub mod types;

pub use loader::{
    apply_key_directory, load_per_host, load_shared, HostCredentials, SharedCredentials,
};
pub use resolver::CredentialResolver;
pub use types::{AuthMethod, Credential, CredentialMode, Secret};
