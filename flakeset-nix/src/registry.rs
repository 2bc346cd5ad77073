//! Nix-backed package registry.
//!
//! Scopes a pinned nixpkgs-style flake to one platform per view and builds
//! the configured package with `nix build`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

use flakeset_builder::{PackageRegistry, RegistryError, RegistryView};
use flakeset_core::{FlakeConfig, Platform, RegistryRef};

use crate::expr::{default_package_expr, flake_exposed_installable};
use crate::output::{diagnostic, parse_build_output, parse_platform_list, NixBuildOutput};

/// Captured result of one `nix` invocation.
struct NixRun {
    success: bool,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

/// How to invoke the `nix` CLI.
#[derive(Debug)]
struct NixCli {
    binary: PathBuf,
    extra_args: Vec<String>,
}

impl NixCli {
    async fn run(&self, args: &[OsString]) -> Result<NixRun, RegistryError> {
        tracing::debug!(
            binary = %self.binary.display(),
            args = ?args,
            "invoking nix"
        );
        let output = Command::new(&self.binary)
            .args(args)
            .args(&self.extra_args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;
        Ok(NixRun {
            success: output.status.success(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// A pinned registry evaluated through the `nix` command-line tool.
///
/// Every [`resolve`](PackageRegistry::resolve) evaluates the registry afresh;
/// nothing is cached between platforms or evaluations.
///
/// Only systems listed in the registry's `lib.systems.flakeExposed` resolve.
/// Systems nixpkgs can still be imported for outside that list (such as
/// `mips64el-linux`) are reported as [`RegistryError::UnresolvablePlatform`].
#[derive(Debug, Clone)]
pub struct NixRegistry {
    reference: RegistryRef,
    package: PathBuf,
    cli: Arc<NixCli>,
}

impl NixRegistry {
    /// Create a registry using `nix` from `$PATH`.
    ///
    /// # Arguments
    /// - `reference`: flake reference of the pinned registry
    /// - `package`: path to the package expression passed to `callPackage`
    #[must_use]
    pub fn new(reference: RegistryRef, package: PathBuf) -> Self {
        Self::with_binary(reference, package, PathBuf::from("nix"))
    }

    /// Create a registry invoking a specific `nix` binary.
    #[must_use]
    pub fn with_binary(reference: RegistryRef, package: PathBuf, binary: PathBuf) -> Self {
        Self {
            reference,
            package,
            cli: Arc::new(NixCli {
                binary,
                extra_args: Vec::new(),
            }),
        }
    }

    /// Create a registry from the registry and package named in `config`.
    #[must_use]
    pub fn from_config(config: &FlakeConfig) -> Self {
        Self::new(config.registry.clone(), config.package.clone())
    }

    /// Invoke `binary` instead of the current `nix`.
    #[must_use]
    pub fn with_nix_binary(mut self, binary: PathBuf) -> Self {
        self.cli = Arc::new(NixCli {
            binary,
            extra_args: self.cli.extra_args.clone(),
        });
        self
    }

    /// Append arguments to every `nix` invocation (e.g. `--offline`).
    #[must_use]
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.cli = Arc::new(NixCli {
            binary: self.cli.binary.clone(),
            extra_args,
        });
        self
    }

    /// The pinned registry reference.
    #[must_use]
    pub fn reference(&self) -> &RegistryRef {
        &self.reference
    }

    /// The package expression path.
    #[must_use]
    pub fn package(&self) -> &Path {
        &self.package
    }

    /// Check that the `nix` binary runs, returning its version line.
    ///
    /// # Errors
    /// Returns [`RegistryError::Io`] if the binary cannot be spawned and
    /// [`RegistryError::InvalidOutput`] if it exits unsuccessfully.
    pub async fn health_check(&self) -> Result<String, RegistryError> {
        let run = self.cli.run(&[OsString::from("--version")]).await?;
        if !run.success {
            return Err(RegistryError::InvalidOutput {
                reason: format!("nix --version: {}", diagnostic(&run.stderr)),
            });
        }
        Ok(String::from_utf8_lossy(&run.stdout).trim().to_owned())
    }

    /// Evaluate the platforms the registry can be scoped to.
    ///
    /// # Errors
    /// Returns [`RegistryError::FetchFailed`] if the registry cannot be
    /// fetched or evaluated.
    pub async fn exposed_platforms(&self) -> Result<Vec<Platform>, RegistryError> {
        let args = [
            OsString::from("eval"),
            OsString::from("--json"),
            OsString::from(flake_exposed_installable(&self.reference)),
        ];
        let run = self.cli.run(&args).await?;
        if !run.success {
            return Err(RegistryError::FetchFailed {
                reference: self.reference.clone(),
                reason: diagnostic(&run.stderr),
            });
        }
        parse_platform_list(&run.stdout)
    }
}

#[async_trait]
impl PackageRegistry for NixRegistry {
    type View = NixView;

    async fn resolve(&self, platform: &Platform) -> Result<NixView, RegistryError> {
        let exposed = self.exposed_platforms().await?;
        if !exposed.contains(platform) {
            return Err(RegistryError::UnresolvablePlatform {
                platform: platform.clone(),
            });
        }

        tracing::debug!(%platform, registry = %self.reference, "registry view resolved");

        Ok(NixView {
            platform: platform.clone(),
            reference: self.reference.clone(),
            package: self.package.clone(),
            cli: Arc::clone(&self.cli),
        })
    }
}

/// A [`NixRegistry`] scoped to one platform.
#[derive(Debug)]
pub struct NixView {
    platform: Platform,
    reference: RegistryRef,
    package: PathBuf,
    cli: Arc<NixCli>,
}

impl NixView {
    /// The platform this view is scoped to.
    #[must_use]
    pub fn platform(&self) -> &Platform {
        &self.platform
    }
}

#[async_trait]
impl RegistryView for NixView {
    type Output = NixBuildOutput;

    async fn default_build(&self) -> Result<NixBuildOutput, RegistryError> {
        let package = tokio::fs::canonicalize(&self.package).await?;
        let expr = default_package_expr(&self.reference, &self.platform, &package);

        tracing::info!(
            platform = %self.platform,
            package = %package.display(),
            "building default package"
        );

        let args = [
            OsString::from("build"),
            OsString::from("--json"),
            OsString::from("--no-link"),
            OsString::from("--impure"),
            OsString::from("--expr"),
            OsString::from(expr),
        ];
        let run = self.cli.run(&args).await?;
        if !run.success {
            return Err(RegistryError::BuildFailed {
                platform: self.platform.clone(),
                reason: diagnostic(&run.stderr),
            });
        }
        parse_build_output(&run.stdout)
    }
}
