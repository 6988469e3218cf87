//! Target host model
//!
//! A host is an address plus the category it was scoped under. The category
//! decides which protocols get validated: Linux via SSH, Windows via SMB,
//! Others via both.

use std::fmt;

/// System category from the scope file section headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Linux,
    Windows,
    Other,
}

impl Category {
    /// Parse a scope/credentials section header like `Linux:` (case-insensitive)
    pub fn from_section(line: &str) -> Option<Category> {
        let lower = line.to_ascii_lowercase();
        if lower.starts_with("linux:") {
            Some(Category::Linux)
        } else if lower.starts_with("windows:") {
            Some(Category::Windows)
        } else if lower.starts_with("others:") {
            Some(Category::Other)
        } else {
            None
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Linux => write!(f, "Linux"),
            Category::Windows => write!(f, "Windows"),
            Category::Other => write!(f, "Others"),
        }
    }
}

/// A single target from the scope file. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub address: String,
    pub category: Category,
}

impl Host {
    pub fn new(address: impl Into<String>, category: Category) -> Self {
        Self {
            address: address.into(),
            category,
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.address, self.category)
    }
}
