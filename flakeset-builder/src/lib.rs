//! Platform-parameterized package-set construction.
//!
//! Defines the registry capability traits and the builder that turns a
//! platform list into a [`PackageSet`](flakeset_core::PackageSet).

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod builder;
pub mod error;
pub mod registry;

pub use builder::{OutputOf, PackageSetBuilder};
pub use error::RegistryError;
pub use registry::{PackageRegistry, RegistryView};
