//! Trusted folder resolution.
//!
//! Project and JIT memory only load inside trusted folders. A folder is trusted
//! when it equals or lies beneath one of the configured trusted folders.

use crate::config::TrustConfig;
use std::path::{Path, PathBuf};

/// Whether `dir` is equal to or inside any of `trusted_folders`.
///
/// Both sides are canonicalized when possible so symlinks and `..` segments
/// do not defeat the check.
pub fn is_trusted(dir: &Path, trusted_folders: &[PathBuf]) -> bool {
    let dir = normalize(dir);
    trusted_folders
        .iter()
        .map(|folder| normalize(folder))
        .any(|folder| dir.starts_with(&folder))
}

/// Trust decision for a workspace under the given configuration
pub fn is_workspace_trusted(dir: &Path, config: &TrustConfig) -> bool {
    config.trust_all || is_trusted(dir, &config.trusted_folders)
}

fn normalize(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
