use std::fmt;

use serde::{Deserialize, Serialize};

/// Registry used when no reference is configured.
pub const DEFAULT_REGISTRY: &str = "github:NixOS/nixpkgs/nixos-unstable";

/// A flake reference naming the pinned package registry.
///
/// Format: any flake reference understood by Nix, e.g.
/// `github:NixOS/nixpkgs/057f9aecfb71c4437d2b27d3323df7f93c010b7e`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[non_exhaustive]
pub struct RegistryRef(pub String);

impl RegistryRef {
    /// Creates a `RegistryRef` from any string-like value.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RegistryRef {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY)
    }
}

impl fmt::Display for RegistryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RegistryRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A SHA-256 content hash for comparing evaluation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Creates a `ContentHash` from a raw 32-byte array.
    #[must_use]
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
