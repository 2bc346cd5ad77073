//! Decoding of `nix build --json` and `nix eval --json` output.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use flakeset_builder::RegistryError;
use flakeset_core::Platform;

/// Store paths produced by building one platform's default package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct NixBuildOutput {
    /// The derivation that was realised.
    pub drv_path: PathBuf,
    /// Output name (`out`, `dev`, `man`, ...) to realised store path.
    pub outputs: BTreeMap<String, PathBuf>,
}

impl NixBuildOutput {
    /// Store path of the `out` output, if the derivation has one.
    #[must_use]
    pub fn out(&self) -> Option<&Path> {
        self.outputs.get("out").map(PathBuf::as_path)
    }
}

/// Decode the JSON array printed by `nix build --json` for one installable.
pub(crate) fn parse_build_output(stdout: &[u8]) -> Result<NixBuildOutput, RegistryError> {
    let mut results: Vec<NixBuildOutput> =
        serde_json::from_slice(stdout).map_err(|e| RegistryError::InvalidOutput {
            reason: format!("nix build --json: {e}"),
        })?;
    match results.len() {
        1 => Ok(results.remove(0)),
        n => Err(RegistryError::InvalidOutput {
            reason: format!("nix build --json: expected 1 result, got {n}"),
        }),
    }
}

/// Decode the platform list printed by `nix eval --json`.
pub(crate) fn parse_platform_list(stdout: &[u8]) -> Result<Vec<Platform>, RegistryError> {
    serde_json::from_slice(stdout).map_err(|e| RegistryError::InvalidOutput {
        reason: format!("nix eval --json: {e}"),
    })
}

/// Condense captured stderr into a single diagnostic.
///
/// Nix prints progress lines before the actual error; keep from the first
/// `error:` line on when there is one, without the `error:` prefix itself.
pub(crate) fn diagnostic(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let start = text
        .lines()
        .position(|line| line.trim_start().starts_with("error:"))
        .unwrap_or(0);
    let kept: Vec<&str> = text.lines().skip(start).collect();
    let joined = kept.join("\n");
    let trimmed = joined.trim();
    let message = trimmed.strip_prefix("error:").unwrap_or(trimmed).trim_start();
    if message.is_empty() {
        "nix exited with no diagnostic".to_owned()
    } else {
        message.to_owned()
    }
}
