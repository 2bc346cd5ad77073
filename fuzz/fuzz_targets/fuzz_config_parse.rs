//! Fuzz target: `FlakeConfig` TOML parsing.
//!
//! Arbitrary documents must either parse or return an error, and anything
//! that parses must render back to TOML without panicking.

#![no_main]

use flakeset_core::FlakeConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = FlakeConfig::from_toml_str(source) {
        let _ = config.to_toml_string();
    }
});
