//! Nix registry backend for the flakeset package-set builder.
//!
//! Scopes a pinned flake registry to each target platform via `nix eval`
//! and builds the configured package's default output with `nix build`.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod expr;
pub mod output;
pub mod registry;

pub use output::NixBuildOutput;
pub use registry::{NixRegistry, NixView};
