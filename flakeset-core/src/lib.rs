//! Core types for the flakeset package-set builder.
//!
//! Defines the domain types shared by every crate: platform identifiers,
//! registry references, the evaluated package set, and the configuration
//! that drives an evaluation.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod id;
pub mod package_set;
pub mod platform;

pub use config::FlakeConfig;
pub use error::CoreError;
pub use id::{ContentHash, RegistryRef, DEFAULT_REGISTRY};
pub use package_set::{PackageSet, PlatformOutputs};
pub use platform::{Platform, DEFAULT_PLATFORMS};
