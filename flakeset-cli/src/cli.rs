//! Argument parsing and effective-configuration resolution.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use flakeset_core::{FlakeConfig, Platform, RegistryRef};

/// Build one default package per target platform from a pinned registry.
#[derive(Parser, Debug)]
#[command(name = "flakeset", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose logging (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate the package set and print it as JSON
    Build(BuildArgs),

    /// Print the effective configuration as TOML without building
    Show(ConfigArgs),

    /// List the platforms the registry can be scoped to
    Platforms(ConfigArgs),

    /// Print the host platform identifier
    Host,
}

/// Options shared by every command that needs a configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// TOML configuration file
    #[arg(short, long, env = "FLAKESET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Flake reference of the pinned registry
    #[arg(long, env = "FLAKESET_REGISTRY")]
    pub registry: Option<String>,

    /// Target platform (repeatable); replaces the configured list
    #[arg(short, long = "platform", value_name = "PLATFORM")]
    pub platforms: Vec<String>,

    /// Path to the package expression
    #[arg(long)]
    pub package: Option<PathBuf>,

    /// The `nix` binary to invoke
    #[arg(long = "nix", env = "FLAKESET_NIX", default_value = "nix")]
    pub nix_binary: PathBuf,

    /// Extra argument appended to every `nix` invocation (repeatable)
    #[arg(long = "nix-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub nix_args: Vec<String>,
}

/// Options for `flakeset build`.
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Build platforms concurrently
    #[arg(long)]
    pub concurrent: bool,

    /// Evaluate twice and fail if the results differ
    #[arg(long)]
    pub check: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl ConfigArgs {
    /// Resolve the effective configuration.
    ///
    /// Starts from the config file when given, otherwise the defaults, then
    /// applies command-line overrides.
    ///
    /// # Errors
    /// Returns [`flakeset_core::CoreError`] if the config file cannot be loaded.
    pub fn resolve(&self) -> Result<FlakeConfig, flakeset_core::CoreError> {
        let mut config = match &self.config {
            Some(path) => FlakeConfig::load(path)?,
            None => FlakeConfig::default(),
        };
        if let Some(registry) = &self.registry {
            config.registry = RegistryRef::new(registry.clone());
        }
        if !self.platforms.is_empty() {
            config.platforms = self.platforms.iter().map(|p| Platform::new(p.as_str())).collect();
        }
        if let Some(package) = &self.package {
            config.package.clone_from(package);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        match Cli::try_parse_from(args) {
            Ok(cli) => cli,
            Err(e) => panic!("unexpected parse error: {e}"),
        }
    }

    #[test]
    fn build_collects_repeated_platforms() {
        let cli = parse(&["flakeset", "build", "-p", "x86_64-linux", "--platform", "aarch64-linux"]);
        let Command::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert_eq!(args.config.platforms, ["x86_64-linux", "aarch64-linux"]);
        assert!(!args.concurrent);
        assert!(!args.check);
    }

    #[test]
    fn build_flags_parse() {
        let cli = parse(&["flakeset", "-vv", "build", "--concurrent", "--check", "--pretty"]);
        assert_eq!(cli.verbose, 2);
        let Command::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert!(args.concurrent && args.check && args.pretty);
    }

    #[test]
    fn nix_args_accept_flags_as_values() {
        let cli = parse(&["flakeset", "platforms", "--nix-arg", "--offline", "--nix-arg", "-L"]);
        let Command::Platforms(args) = cli.command else {
            panic!("expected platforms command");
        };
        assert_eq!(args.nix_args, ["--offline", "-L"]);
    }

    #[test]
    fn missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["flakeset"]).is_err());
    }

    #[test]
    fn resolve_without_file_uses_defaults() {
        let args = ConfigArgs { nix_binary: PathBuf::from("nix"), ..ConfigArgs::default() };
        let config = args.resolve().expect("defaults resolve");
        assert_eq!(config, FlakeConfig::default());
    }

    #[test]
    fn resolve_flags_override_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("flakeset.toml");
        std::fs::write(
            &path,
            "platforms = [\"i686-linux\"]\nregistry = \"github:NixOS/nixpkgs/nixos-23.11\"\n",
        )
        .expect("write config");

        let args = ConfigArgs {
            config: Some(path),
            registry: None,
            platforms: vec!["riscv64-linux".to_owned()],
            package: Some(PathBuf::from("/src/hello")),
            nix_binary: PathBuf::from("nix"),
            nix_args: Vec::new(),
        };
        let config = args.resolve().expect("config resolves");

        assert_eq!(config.platforms, vec![Platform::new("riscv64-linux")]);
        assert_eq!(config.registry.as_str(), "github:NixOS/nixpkgs/nixos-23.11");
        assert_eq!(config.package, PathBuf::from("/src/hello"));
    }
}
