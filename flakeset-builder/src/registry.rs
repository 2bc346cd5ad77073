//! Package registry abstraction traits.
//!
//! Allows swapping between a Nix-backed registry and in-memory test
//! doubles without changing the builder.

use async_trait::async_trait;
use flakeset_core::Platform;

use crate::RegistryError;

/// A pinned package registry that can be scoped to one platform.
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// The platform-scoped view this registry produces.
    type View: RegistryView;

    /// Produce a view of the registry scoped to `platform`.
    ///
    /// Called once per platform per evaluation. Implementations must not
    /// hand out views shared with another platform.
    ///
    /// # Errors
    /// Returns [`RegistryError::UnresolvablePlatform`] if the registry does not
    /// know the identifier.
    /// Returns [`RegistryError::FetchFailed`] if the registry cannot be retrieved.
    async fn resolve(&self, platform: &Platform) -> Result<Self::View, RegistryError>;
}

/// A registry scoped to a single platform.
#[async_trait]
pub trait RegistryView: Send + Sync {
    /// Opaque build output descriptor.
    type Output: Send;

    /// Build the default package for this view's platform.
    ///
    /// # Errors
    /// Returns [`RegistryError::BuildFailed`] if the build fails.
    async fn default_build(&self) -> Result<Self::Output, RegistryError>;
}

