//! Command-line front end for the flakeset package-set builder.
//!
//! Resolves configuration from a TOML file and flags, evaluates the package
//! set through a Nix registry, and prints the result as JSON.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod cli;
pub mod error;
pub mod run;

pub use cli::Cli;
pub use error::CliError;
pub use run::run;
