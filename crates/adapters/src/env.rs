// SPDX-License-Identifier: MIT

//! `HOME`-derived defaults (spec.md Section 6).

use std::path::PathBuf;

/// Default SSH identity file name when a feed doesn't configure
/// `key_filename`.
pub const DEFAULT_IDENTITY_FILE: &str = "id_buffalofq_rsa";

/// Resolve the default SSH identity file path: `$HOME/.ssh/<default>`.
/// Falls back to a bare relative path if `HOME` can't be determined
/// (e.g. a minimal container), matching `dirs::home_dir()`'s own
/// fallback behavior elsewhere in this pack.
pub fn default_identity_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".ssh").join(DEFAULT_IDENTITY_FILE),
        None => PathBuf::from(DEFAULT_IDENTITY_FILE),
    }
}

/// Resolve a feed's `key_filename`, applying the default when absent.
/// A relative configured value is resolved under `$HOME/.ssh/` just
/// like the default, rather than the process's current directory.
pub fn resolve_identity_path(key_filename: Option<&str>) -> PathBuf {
    match key_filename {
        None => default_identity_path(),
        Some(name) => {
            let path = PathBuf::from(name);
            if path.is_absolute() {
                path
            } else if let Some(home) = dirs::home_dir() {
                home.join(".ssh").join(path)
            } else {
                path
            }
        }
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
