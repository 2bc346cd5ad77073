use std::path::PathBuf;

/// Errors produced by the `flakeset-core` crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// The running host has no Nix system double.
    #[error("unsupported host: {arch}-{os}")]
    UnsupportedHost { arch: String, os: String },

    /// A configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration document could not be parsed.
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration could not be rendered back to TOML.
    #[error("failed to render config: {0}")]
    ConfigRender(#[from] toml::ser::Error),

    /// A package set could not be encoded.
    #[error("failed to encode package set: {0}")]
    Encode(#[from] serde_json::Error),
}
