//! Error types for the command-line front end.

use flakeset_builder::RegistryError;
use flakeset_core::{ContentHash, CoreError};

/// Errors that end a `flakeset` invocation.
///
/// Registry and configuration failures display exactly as their source
/// does; the CLI adds no context of its own.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CliError {
    /// Loading or rendering configuration failed.
    #[error(transparent)]
    Config(#[from] CoreError),

    /// The registry or a platform build failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Two evaluations of the same inputs produced different package sets.
    #[error("package set is not deterministic: first evaluation {first}, second {second}")]
    Nondeterministic { first: ContentHash, second: ContentHash },

    /// Writing output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Encoding output failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
