//! Fuzz target: `PackageSet` JSON decoding and digest.
//!
//! Any JSON that decodes into a package set must re-encode and hash
//! without panicking, and its digest must be stable across re-encoding.

#![no_main]

use flakeset_core::PackageSet;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(set) = serde_json::from_slice::<PackageSet<serde_json::Value>>(data) else {
        return;
    };
    let digest = set.digest().expect("decoded package set must re-encode");
    let json = set.to_json().expect("decoded package set must re-encode");
    let again: PackageSet<serde_json::Value> =
        serde_json::from_str(&json).expect("re-encoded package set must decode");
    assert_eq!(again.digest().expect("re-encode"), digest, "digest must be stable");
});
