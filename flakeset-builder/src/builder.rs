//! Package-set builder wrapping a [`PackageRegistry`].
//!
//! Maps every configured platform to `{ default = view.default_build() }`.

use std::time::Instant;

use flakeset_core::{FlakeConfig, PackageSet, Platform};

use crate::{PackageRegistry, RegistryError, RegistryView};

/// The build output type produced by registry `R`.
pub type OutputOf<R> = <<R as PackageRegistry>::View as RegistryView>::Output;

/// Builds one default output per platform from a registry.
///
/// Evaluation is all-or-nothing: the first registry or build failure aborts
/// the whole evaluation and is returned unchanged. No partial package set is
/// ever produced.
pub struct PackageSetBuilder<R: PackageRegistry> {
    registry: R,
    platforms: Vec<Platform>,
}

impl<R: PackageRegistry> PackageSetBuilder<R> {
    /// Create a builder over `platforms`.
    ///
    /// Identifiers are not validated here; the registry decides.
    #[must_use]
    pub fn new(registry: R, platforms: Vec<Platform>) -> Self {
        Self { registry, platforms }
    }

    /// Create a builder over the platforms named in `config`.
    #[must_use]
    pub fn from_config(registry: R, config: &FlakeConfig) -> Self {
        Self::new(registry, config.platforms.clone())
    }

    /// The platforms this builder evaluates, in input order.
    #[must_use]
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// The underlying registry.
    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Evaluate the package set one platform at a time, in input order.
    ///
    /// Each platform gets a fresh view from the registry. Duplicate
    /// identifiers are evaluated again and collapse to a single entry.
    ///
    /// # Errors
    /// Propagates the first error raised by [`PackageRegistry::resolve`] or
    /// [`RegistryView::default_build`].
    pub async fn build(&self) -> Result<PackageSet<OutputOf<R>>, RegistryError> {
        let started = Instant::now();
        tracing::info!(platforms = self.platforms.len(), "evaluating package set");

        let mut set = PackageSet::new();
        for platform in &self.platforms {
            let output = build_platform(&self.registry, platform).await?;
            set.insert(platform.clone(), output);
        }

        tracing::info!(
            platforms = set.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "package set evaluated"
        );
        Ok(set)
    }

    /// Evaluate every platform concurrently.
    ///
    /// Produces the same package set as [`build`](Self::build); only
    /// wall-clock time differs. On the first failure the remaining
    /// platform builds are dropped.
    ///
    /// # Errors
    /// Propagates the first error raised by any platform.
    pub async fn build_concurrent(&self) -> Result<PackageSet<OutputOf<R>>, RegistryError> {
        let started = Instant::now();
        tracing::info!(
            platforms = self.platforms.len(),
            "evaluating package set concurrently"
        );

        let builds = self.platforms.iter().map(|platform| async move {
            let output = build_platform(&self.registry, platform).await?;
            Ok::<_, RegistryError>((platform.clone(), output))
        });
        let set: PackageSet<_> = futures::future::try_join_all(builds)
            .await?
            .into_iter()
            .collect();

        tracing::info!(
            platforms = set.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "package set evaluated"
        );
        Ok(set)
    }
}

async fn build_platform<R: PackageRegistry>(
    registry: &R,
    platform: &Platform,
) -> Result<OutputOf<R>, RegistryError> {
    let started = Instant::now();
    let view = registry.resolve(platform).await?;
    let output = view.default_build().await?;
    tracing::debug!(
        %platform,
        elapsed_ms = started.elapsed().as_millis(),
        "default output built"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    struct CountingRegistry {
        resolved: AtomicUsize,
    }

    struct UnitView;

    #[async_trait]
    impl PackageRegistry for CountingRegistry {
        type View = UnitView;

        async fn resolve(&self, _platform: &Platform) -> Result<UnitView, RegistryError> {
            self.resolved.fetch_add(1, Ordering::SeqCst);
            Ok(UnitView)
        }
    }

    #[async_trait]
    impl RegistryView for UnitView {
        type Output = ();

        async fn default_build(&self) -> Result<(), RegistryError> {
            Ok(())
        }
    }

    struct FailAfterRegistry {
        ok_budget: usize,
        resolved: AtomicUsize,
    }

    #[async_trait]
    impl PackageRegistry for FailAfterRegistry {
        type View = UnitView;

        async fn resolve(&self, platform: &Platform) -> Result<UnitView, RegistryError> {
            if self.resolved.fetch_add(1, Ordering::SeqCst) >= self.ok_budget {
                return Err(RegistryError::UnresolvablePlatform { platform: platform.clone() });
            }
            Ok(UnitView)
        }
    }

    fn platforms(ids: &[&str]) -> Vec<Platform> {
        ids.iter().map(|id| Platform::new(*id)).collect()
    }

    #[tokio::test]
    async fn builder_resolves_one_fresh_view_per_platform() {
        let registry = CountingRegistry { resolved: AtomicUsize::new(0) };
        let builder = PackageSetBuilder::new(registry, platforms(&["a-linux", "b-linux", "c-linux"]));

        let set = builder.build().await.expect("all platforms resolve");

        assert_eq!(set.len(), 3);
        assert_eq!(builder.registry().resolved.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn builder_duplicate_platforms_collapse_but_are_each_resolved() {
        let registry = CountingRegistry { resolved: AtomicUsize::new(0) };
        let builder = PackageSetBuilder::new(registry, platforms(&["x86_64-linux", "x86_64-linux"]));

        let set = builder.build().await.expect("all platforms resolve");

        assert_eq!(set.len(), 1, "duplicate identifiers must collapse to one key");
        assert_eq!(builder.registry().resolved.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn builder_stops_at_first_failure() {
        let registry = FailAfterRegistry { ok_budget: 1, resolved: AtomicUsize::new(0) };
        let builder = PackageSetBuilder::new(registry, platforms(&["a-linux", "b-linux", "c-linux"]));

        let result = builder.build().await;

        assert!(
            matches!(
                result,
                Err(RegistryError::UnresolvablePlatform { ref platform }) if platform.as_str() == "b-linux"
            ),
            "second platform must fail, got {result:?}"
        );
        assert_eq!(
            builder.registry().resolved.load(Ordering::SeqCst),
            2,
            "no platform after the failing one may be resolved"
        );
    }

    #[tokio::test]
    async fn builder_from_config_uses_config_platforms() {
        let registry = CountingRegistry { resolved: AtomicUsize::new(0) };
        let config = FlakeConfig::default();
        let builder = PackageSetBuilder::from_config(registry, &config);
        assert_eq!(builder.platforms(), config.platforms.as_slice());
    }
}
