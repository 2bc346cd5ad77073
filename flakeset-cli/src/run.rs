//! Command execution.

use std::io::Write;

use serde::Serialize;

use flakeset_builder::{OutputOf, PackageRegistry, PackageSetBuilder};
use flakeset_core::{FlakeConfig, PackageSet, Platform};
use flakeset_nix::NixRegistry;

use crate::cli::{BuildArgs, Cli, Command, ConfigArgs};
use crate::error::CliError;

/// Execute the parsed command, writing its result to `out`.
///
/// # Errors
/// Returns the first configuration, registry, or output failure.
pub async fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    match cli.command {
        Command::Build(args) => build(&args, out).await,
        Command::Show(args) => show(&args, out),
        Command::Platforms(args) => platforms(&args, out).await,
        Command::Host => host(out),
    }
}

fn registry_for(args: &ConfigArgs, config: &FlakeConfig) -> NixRegistry {
    let registry = NixRegistry::from_config(config)
        .with_nix_binary(args.nix_binary.clone())
        .with_extra_args(args.nix_args.clone());
    tracing::debug!(
        registry = %registry.reference(),
        package = %registry.package().display(),
        "using nix registry"
    );
    registry
}

async fn build(args: &BuildArgs, out: &mut impl Write) -> Result<(), CliError> {
    let config = args.config.resolve()?;
    let builder = PackageSetBuilder::from_config(registry_for(&args.config, &config), &config);

    let set = if args.check {
        evaluate_checked(&builder, args.concurrent).await?
    } else {
        evaluate(&builder, args.concurrent).await?
    };

    if args.pretty {
        serde_json::to_writer_pretty(&mut *out, &set)?;
    } else {
        serde_json::to_writer(&mut *out, &set)?;
    }
    writeln!(out)?;
    Ok(())
}

async fn evaluate<R: PackageRegistry>(
    builder: &PackageSetBuilder<R>,
    concurrent: bool,
) -> Result<PackageSet<OutputOf<R>>, CliError> {
    let set = if concurrent {
        builder.build_concurrent().await?
    } else {
        builder.build().await?
    };
    Ok(set)
}

/// Evaluate twice and require identical digests.
///
/// # Errors
/// Returns [`CliError::Nondeterministic`] if the two package sets differ.
pub async fn evaluate_checked<R>(
    builder: &PackageSetBuilder<R>,
    concurrent: bool,
) -> Result<PackageSet<OutputOf<R>>, CliError>
where
    R: PackageRegistry,
    OutputOf<R>: Serialize,
{
    let first = evaluate(builder, concurrent).await?;
    let second = evaluate(builder, concurrent).await?;
    let (first_digest, second_digest) = (first.digest()?, second.digest()?);
    if first_digest != second_digest {
        return Err(CliError::Nondeterministic {
            first: first_digest,
            second: second_digest,
        });
    }
    tracing::info!(digest = %first_digest, "package set is deterministic");
    Ok(first)
}

fn show(args: &ConfigArgs, out: &mut impl Write) -> Result<(), CliError> {
    let config = args.resolve()?;
    write!(out, "{}", config.to_toml_string()?)?;
    Ok(())
}

async fn platforms(args: &ConfigArgs, out: &mut impl Write) -> Result<(), CliError> {
    let config = args.resolve()?;
    for platform in registry_for(args, &config).exposed_platforms().await? {
        writeln!(out, "{platform}")?;
    }
    Ok(())
}

fn host(out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "{}", Platform::host()?)?;
    Ok(())
}
