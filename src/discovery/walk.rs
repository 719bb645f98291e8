//! Downward directory walker for project memory discovery

use crate::error::ApiError;
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

/// Directory walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: false)
    pub follow_symlinks: bool,
    /// Directory names to prune (e.g. ".git", "target", "node_modules")
    pub ignore_dirs: Vec<String>,
    /// Maximum depth below the root to descend into
    pub max_depth: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            ignore_dirs: vec![
                ".git".to_string(),
                "target".to_string(),
                "node_modules".to_string(),
                ".cargo".to_string(),
            ],
            max_depth: 3,
        }
    }
}

/// Walks the directories beneath a root
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Collect every non-ignored directory strictly below the root.
    ///
    /// Ignored directories are pruned together with their subtrees. Results
    /// are sorted by path so discovery order is deterministic.
    pub fn directories(&self) -> Result<Vec<PathBuf>, ApiError> {
        let mut dirs = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .min_depth(1)
            .max_depth(self.config.max_depth)
            .into_iter()
            .filter_entry(|entry| !self.should_ignore(entry));

        for entry in walker {
            let entry = entry.map_err(|e| {
                ApiError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to walk directory {:?}: {}", self.root, e),
                ))
            })?;
            if entry.file_type().is_dir() {
                dirs.push(entry.into_path());
            }
        }

        dirs.sort();
        Ok(dirs)
    }

    fn should_ignore(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map(|name| self.config.ignore_dirs.iter().any(|ignored| ignored == name))
                .unwrap_or(false)
    }
}
