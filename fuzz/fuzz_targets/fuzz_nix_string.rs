//! Fuzz target: Nix string literal escaping.
//!
//! No input may produce a literal containing an unescaped `"` or an
//! unescaped `${`.

#![no_main]

use flakeset_nix::expr::nix_string;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = std::str::from_utf8(data) else {
        return;
    };
    let quoted = nix_string(value);
    assert!(quoted.starts_with('"') && quoted.ends_with('"') && quoted.len() >= 2);

    let inner = &quoted[1..quoted.len() - 1];
    let mut escaped = false;
    let mut prev_dollar = false;
    for c in inner.chars() {
        assert!(escaped || c != '"', "unescaped quote in {quoted}");
        assert!(escaped || !(prev_dollar && c == '{'), "interpolation opened in {quoted}");
        prev_dollar = !escaped && c == '$';
        escaped = !escaped && c == '\\';
    }
    assert!(!escaped, "dangling escape in {quoted}");
});
