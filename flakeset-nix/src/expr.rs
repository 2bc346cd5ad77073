//! Rendering of the Nix expressions handed to `nix build`.

use std::path::Path;

use flakeset_core::{Platform, RegistryRef};

/// Attribute path of the registry's list of platforms it can be scoped to.
pub const FLAKE_EXPOSED_ATTR: &str = "lib.systems.flakeExposed";

/// Quote `value` as a Nix string literal.
///
/// Escapes `\`, `"`, and `${` so arbitrary text cannot break out of the
/// literal or start an interpolation.
#[must_use]
pub fn nix_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Installable that lists the platforms `registry` exposes.
#[must_use]
pub fn flake_exposed_installable(registry: &RegistryRef) -> String {
    format!("{registry}#{FLAKE_EXPOSED_ATTR}")
}

/// Expression producing the default package of `package` for `platform`.
///
/// Equivalent to `(import nixpkgs { inherit system; }).callPackage ./. { }`
/// with the registry and path spelled out. `package` must be absolute.
#[must_use]
pub fn default_package_expr(registry: &RegistryRef, platform: &Platform, package: &Path) -> String {
    format!(
        "let pkgs = import (builtins.getFlake {registry}) {{ system = {system}; }}; \
         in pkgs.callPackage (/. + {package}) {{ }}",
        registry = nix_string(registry.as_str()),
        system = nix_string(platform.as_str()),
        package = nix_string(&package.to_string_lossy()),
    )
}
