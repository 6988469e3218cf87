//! Credential file parsing
//!
//! Two on-disk formats feed the resolver:
//!
//! Shared (`credentials.txt`): the scope-style section headers, then
//! `"key" "value"` pairs split on the first space, quotes stripped, keys
//! lowercased. Recognized keys: `username`, `password`, `domain`. A section
//! missing username or password gets a warning and no credential; the gap
//! surfaces per host as a missing-credentials result, not a fatal error.
//!
//! Per-host (`ssh_creds.txt` / `smb_creds.txt`): one `address:"user":"pass"`
//! entry per line.
//!
//! Key-based SSH auth swaps each credential's secret for a key file looked
//! up by username in the key directory (`<username>` or `<username>.pem`).

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::credentials::types::{Credential, Secret};
use crate::error::CredentialError;
use crate::scope::Category;

/// Shared credentials: at most one per category
pub type SharedCredentials = HashMap<Category, Credential>;

/// Per-host overrides: address -> credential
pub type HostCredentials = HashMap<String, Credential>;

/// Load the shared credentials file
pub fn load_shared(path: &Path) -> Result<SharedCredentials, CredentialError> {
    let content = read(path)?;
    let creds = parse_shared(&content);
    for category in [Category::Linux, Category::Windows, Category::Other] {
        if !creds.contains_key(&category) {
            warn!(
                "{} credentials incomplete (missing username or password)",
                category
            );
        }
    }
    Ok(creds)
}

/// Load a per-host override file
pub fn load_per_host(path: &Path) -> Result<HostCredentials, CredentialError> {
    let content = read(path)?;
    let creds = parse_per_host(&content);
    info!(
        "Loaded {} per-host credential entries from {}",
        creds.len(),
        path.display()
    );
    Ok(creds)
}

fn read(path: &Path) -> Result<String, CredentialError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(CredentialError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => Err(CredentialError::IoError(path.to_path_buf(), e)),
    }
}

/// Parse shared credentials content
pub fn parse_shared(content: &str) -> SharedCredentials {
    let mut sections: HashMap<Category, HashMap<String, String>> = HashMap::new();
    let mut current_section: Option<Category> = None;

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(category) = Category::from_section(line) {
            current_section = Some(category);
            continue;
        }

        let Some(category) = current_section else {
            warn!("Ignoring credential line outside any section");
            continue;
        };

        if let Some((key, value)) = line.split_once(' ') {
            let key = key.trim().trim_matches('"').to_ascii_lowercase();
            let value = value.trim().trim_matches('"').to_string();
            sections.entry(category).or_default().insert(key, value);
        }
    }

    let mut creds = SharedCredentials::new();
    for (category, fields) in sections {
        let (Some(username), Some(password)) = (fields.get("username"), fields.get("password"))
        else {
            continue;
        };
        creds.insert(
            category,
            Credential::password(username, password, fields.get("domain").cloned()),
        );
    }
    creds
}

/// Parse per-host override content (`address:"username":"password"`)
pub fn parse_per_host(content: &str) -> HostCredentials {
    let mut creds = HostCredentials::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.splitn(3, ':');
        let address = parts.next().map(str::trim).unwrap_or("");
        let username = parts.next().map(|s| s.trim().trim_matches('"'));
        let password = parts.next().map(|s| s.trim().trim_matches('"'));

        match (username, password) {
            (Some(username), Some(password)) if !address.is_empty() && !username.is_empty() => {
                creds.insert(
                    address.to_string(),
                    Credential::password(username, password, None),
                );
            }
            _ => warn!("Malformed per-host credential at line {}", idx + 1),
        }
    }

    creds
}

/// Replace each credential's password with the matching key file from the
/// key directory. A username with no key keeps nothing: validation for it
/// will classify as a key error at attempt time rather than fail the load.
pub fn apply_key_directory(
    creds: &mut SharedCredentials,
    key_dir: &Path,
) -> Result<(), CredentialError> {
    if !key_dir.is_dir() {
        return Err(CredentialError::KeyDirNotFound(key_dir.to_path_buf()));
    }

    for cred in creds.values_mut() {
        let plain = key_dir.join(&cred.username);
        let pem = key_dir.join(format!("{}.pem", cred.username));
        let key_path = if plain.is_file() {
            plain
        } else if pem.is_file() {
            pem
        } else {
            warn!("No key file for user {} in {}", cred.username, key_dir.display());
            key_dir.join(&cred.username)
        };
        cred.secret = Secret::KeyFile(key_path);
    }

    Ok(())
}
