use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The platforms a package set targets when none are configured.
pub const DEFAULT_PLATFORMS: [&str; 3] = ["aarch64-linux", "i686-linux", "x86_64-linux"];

/// An opaque target platform identifier, e.g. `x86_64-linux`.
///
/// No validation happens here. Whether an identifier is meaningful is
/// decided by the registry it is handed to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Platform(String);

impl Platform {
    /// Creates a `Platform` from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the platform of the running host as a Nix system double.
    ///
    /// # Errors
    /// Returns [`CoreError::UnsupportedHost`] if the host OS has no Nix name.
    pub fn host() -> Result<Self, CoreError> {
        Self::from_host_parts(std::env::consts::ARCH, std::env::consts::OS)
    }

    fn from_host_parts(arch: &str, os: &str) -> Result<Self, CoreError> {
        let os = match os {
            "linux" => "linux",
            "macos" => "darwin",
            "freebsd" => "freebsd",
            other => {
                return Err(CoreError::UnsupportedHost {
                    arch: arch.to_owned(),
                    os: other.to_owned(),
                })
            }
        };
        let arch = match arch {
            "x86" => "i686",
            other => other,
        };
        Ok(Self(format!("{arch}-{os}")))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Architecture half of a system double (`x86_64` in `x86_64-linux`).
    #[must_use]
    pub fn arch(&self) -> Option<&str> {
        self.0.split_once('-').map(|(arch, _)| arch)
    }

    /// OS half of a system double (`linux` in `x86_64-linux`).
    #[must_use]
    pub fn os(&self) -> Option<&str> {
        self.0.split_once('-').map(|(_, os)| os)
    }

    /// The default three Linux platforms.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        DEFAULT_PLATFORMS.iter().map(|p| Self::new(*p)).collect()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Platform {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Platform {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl AsRef<str> for Platform {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
