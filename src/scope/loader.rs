//! Scope file parsing
//!
//! Reads the sectioned scope format: `Linux:`, `Windows:`, `Others:` headers
//! followed by one address per line. `#` starts a comment (whole-line or
//! inline), blank lines are skipped. Lines outside any section and addresses
//! that are neither an IP nor a plausible hostname are logged and skipped;
//! a missing file aborts the run.

use std::fs;
use std::net::IpAddr;
use std::path::Path;

use log::{info, warn};

use crate::error::ScopeError;
use crate::scope::host::{Category, Host};

/// Load and parse the scope file into a host list
pub fn load_scope(path: &Path) -> Result<Vec<Host>, ScopeError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ScopeError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(ScopeError::IoError(path.to_path_buf(), e)),
    };

    let hosts = parse_scope(&content);
    if hosts.is_empty() {
        return Err(ScopeError::Empty(path.to_path_buf()));
    }

    for category in [Category::Linux, Category::Windows, Category::Other] {
        let count = hosts.iter().filter(|h| h.category == category).count();
        info!("Loaded {} {} hosts", count, category);
    }

    Ok(hosts)
}

/// Parse scope file content. Separated from I/O so tests can feed strings.
pub fn parse_scope(content: &str) -> Vec<Host> {
    let mut hosts: Vec<Host> = Vec::new();
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
            warn!("Ignoring scope line outside any section: {}", line);
            continue;
        };

        // Strip inline comments
        let address = line.split('#').next().unwrap_or("").trim();
        if address.is_empty() {
            continue;
        }

        if !is_valid_address(address) {
            warn!("Invalid address in scope: {}", address);
            continue;
        }

        // Same address twice under one category would double-validate it
        if hosts
            .iter()
            .any(|h| h.category == category && h.address == address)
        {
            warn!("Duplicate {} address in scope: {}", category, address);
            continue;
        }

        hosts.push(Host::new(address, category));
    }

    hosts
}

/// Accept IP addresses and RFC 952-ish hostnames
fn is_valid_address(address: &str) -> bool {
    if address.parse::<IpAddr>().is_ok() {
        return true;
    }
    // Digits-and-dots that failed the IP parse is a typo, not a hostname
    if address.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return false;
    }
    !address.is_empty()
        && address.len() <= 253
        && address
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        && !address.starts_with('-')
        && !address.starts_with('.')
}
