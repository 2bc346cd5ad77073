//! The evaluated package set: one `{ default = ... }` entry per platform.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::id::ContentHash;
use crate::platform::Platform;

/// Outputs produced for a single platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct PlatformOutputs<O> {
    /// The platform's default build output.
    pub default: O,
}

impl<O> PlatformOutputs<O> {
    /// Wraps a build output as the platform's default.
    pub fn new(default: O) -> Self {
        Self { default }
    }
}

/// Mapping from platform identifier to that platform's outputs.
///
/// Serializes as `{"<platform>": {"default": <output>}}`. Keys are kept
/// sorted so two equal sets always encode identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageSet<O>(BTreeMap<Platform, PlatformOutputs<O>>);

impl<O> PackageSet<O> {
    /// Creates an empty package set.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Inserts the default output for `platform`, replacing any earlier one.
    pub fn insert(&mut self, platform: Platform, default: O) {
        self.0.insert(platform, PlatformOutputs::new(default));
    }

    /// Returns the outputs for `platform`, if present.
    #[must_use]
    pub fn get(&self, platform: &Platform) -> Option<&PlatformOutputs<O>> {
        self.0.get(platform)
    }

    /// Returns the default output for `platform`, if present.
    #[must_use]
    pub fn default_for(&self, platform: &Platform) -> Option<&O> {
        self.0.get(platform).map(|outputs| &outputs.default)
    }

    /// Iterates over the platforms in sorted order.
    pub fn platforms(&self) -> impl Iterator<Item = &Platform> {
        self.0.keys()
    }

    /// Iterates over `(platform, outputs)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&Platform, &PlatformOutputs<O>)> {
        self.0.iter()
    }

    /// Number of platforms in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set has no platforms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<O: Serialize> PackageSet<O> {
    /// Canonical JSON encoding.
    ///
    /// # Errors
    /// Returns [`CoreError::Encode`] if an output fails to serialize.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// SHA-256 of the canonical JSON encoding.
    ///
    /// Equal sets always have equal digests.
    ///
    /// # Errors
    /// Returns [`CoreError::Encode`] if an output fails to serialize.
    pub fn digest(&self) -> Result<ContentHash, CoreError> {
        let encoded = serde_json::to_vec(self)?;
        let hash = Sha256::digest(&encoded);
        Ok(ContentHash::new(hash.into()))
    }
}

impl<O> Default for PackageSet<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> FromIterator<(Platform, O)> for PackageSet<O> {
    fn from_iter<I: IntoIterator<Item = (Platform, O)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (platform, default) in iter {
            set.insert(platform, default);
        }
        set
    }
}

impl<O> IntoIterator for PackageSet<O> {
    type Item = (Platform, PlatformOutputs<O>);
    type IntoIter = std::collections::btree_map::IntoIter<Platform, PlatformOutputs<O>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker_set(platforms: &[&str]) -> PackageSet<String> {
        platforms
            .iter()
            .map(|p| (Platform::new(*p), (*p).to_owned()))
            .collect()
    }

    #[test]
    fn json_shape_nests_default_under_platform() {
        let set = marker_set(&["x86_64-linux", "aarch64-linux"]);
        let json = set.to_json().expect("encode");
        assert_eq!(
            json,
            r#"{"aarch64-linux":{"default":"aarch64-linux"},"x86_64-linux":{"default":"x86_64-linux"}}"#
        );
    }

    #[test]
    fn empty_set_encodes_as_empty_object() {
        let set: PackageSet<String> = PackageSet::new();
        assert!(set.is_empty());
        assert_eq!(set.to_json().expect("encode"), "{}");
    }

    #[test]
    fn insert_replaces_existing_platform() {
        let mut set = PackageSet::new();
        set.insert(Platform::new("i686-linux"), 1);
        set.insert(Platform::new("i686-linux"), 2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.default_for(&Platform::new("i686-linux")), Some(&2));
    }

    #[test]
    fn digest_ignores_insertion_order() {
        let a = marker_set(&["aarch64-linux", "i686-linux", "x86_64-linux"]);
        let b = marker_set(&["x86_64-linux", "aarch64-linux", "i686-linux"]);
        assert_eq!(a.digest().expect("digest"), b.digest().expect("digest"));
    }

    #[test]
    fn digest_differs_when_output_differs() {
        let a = marker_set(&["x86_64-linux"]);
        let mut b = PackageSet::new();
        b.insert(Platform::new("x86_64-linux"), "something-else".to_owned());
        assert_ne!(a.digest().expect("digest"), b.digest().expect("digest"));
    }

    #[test]
    fn empty_set_digest_is_sha256_of_empty_object() {
        let hex = marker_set(&[]).digest().expect("digest").to_string();
        assert_eq!(hex, "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a");
    }
}
