//! Package-set configuration: which platforms, which registry, which package.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::RegistryRef;
use crate::platform::Platform;

/// Explicit inputs to one package-set evaluation.
///
/// Every field has a default, so an empty TOML document is a valid config:
///
/// ```toml
/// platforms = ["aarch64-linux", "i686-linux", "x86_64-linux"]
/// registry = "github:NixOS/nixpkgs/nixos-unstable"
/// package = "."
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct FlakeConfig {
    /// Platforms to produce a default output for.
    pub platforms: Vec<Platform>,

    /// The pinned package registry every platform view is scoped from.
    pub registry: RegistryRef,

    /// Path to the package expression handed to the registry's `callPackage`.
    pub package: PathBuf,
}

impl FlakeConfig {
    /// Create a config with the given platforms and registry.
    #[must_use]
    pub fn new(platforms: Vec<Platform>, registry: RegistryRef) -> Self {
        Self {
            platforms,
            registry,
            package: PathBuf::from("."),
        }
    }

    /// Set the package expression path.
    #[must_use]
    pub fn with_package(mut self, package: impl Into<PathBuf>) -> Self {
        self.package = package.into();
        self
    }

    /// Parse a config from a TOML document.
    ///
    /// # Errors
    /// Returns [`CoreError::ConfigParse`] on malformed TOML or unknown keys.
    pub fn from_toml_str(source: &str) -> Result<Self, CoreError> {
        Ok(toml::from_str(source)?)
    }

    /// Load a config from a TOML file.
    ///
    /// A relative `package` path is resolved against the file's directory.
    ///
    /// # Errors
    /// Returns [`CoreError::ConfigRead`] if the file cannot be read and
    /// [`CoreError::ConfigParse`] if it is not a valid config.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let source = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&source)?;
        if config.package.is_relative() {
            if let Some(dir) = path.parent() {
                config.package = dir.join(&config.package);
            }
        }
        Ok(config)
    }

    /// Render the config as TOML.
    ///
    /// # Errors
    /// Returns [`CoreError::ConfigRender`] if a value cannot be represented.
    pub fn to_toml_string(&self) -> Result<String, CoreError> {
        Ok(toml::to_string(self)?)
    }
}

impl Default for FlakeConfig {
    fn default() -> Self {
        Self::new(Platform::defaults(), RegistryRef::default())
    }
}
