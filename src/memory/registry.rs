//! Loaded-path registry: session-scoped set of incorporated source files.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// Set of every source path incorporated since the last refresh
#[derive(Debug, Clone, Default)]
pub struct LoadedPathRegistry {
    paths: HashSet<PathBuf>,
}

impl LoadedPathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    /// Register one path; returns false if it was already present
    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.paths.insert(path)
    }

    /// Register several paths; returns how many were new
    pub fn extend<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        paths
            .into_iter()
            .filter(|path| self.paths.insert(path.clone()))
            .count()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Copy handed to JIT loaders so they can skip known files
    pub fn to_set(&self) -> HashSet<PathBuf> {
        self.paths.clone()
    }

    /// Sorted read-only copy for callers
    pub fn snapshot(&self) -> BTreeSet<PathBuf> {
        self.paths.iter().cloned().collect()
    }
}
