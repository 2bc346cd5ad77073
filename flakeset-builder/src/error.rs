//! Error types raised by registries and their platform views.

use flakeset_core::{Platform, RegistryRef};

/// Failures originating in the external registry or build machinery.
///
/// The builder never constructs these itself. It returns whatever the
/// registry raised, unchanged.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// The registry cannot produce a view for this platform.
    #[error("unresolvable platform: {platform}")]
    UnresolvablePlatform { platform: Platform },

    /// The registry itself could not be retrieved.
    #[error("failed to fetch registry {reference}: {reason}")]
    FetchFailed { reference: RegistryRef, reason: String },

    /// Building the default output failed for this platform.
    #[error("build failed for {platform}: {reason}")]
    BuildFailed { platform: Platform, reason: String },

    /// The external tool returned output that could not be decoded.
    #[error("invalid registry output: {reason}")]
    InvalidOutput { reason: String },

    /// Underlying I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
