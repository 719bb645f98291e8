//! Core types shared by the tier sources, the flattener, and the context manager.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Scope of a context source.
///
/// Session tiers load in declaration order during a refresh; `Jit` only
/// loads on explicit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Global,
    Extension,
    Project,
    Jit,
}

impl Tier {
    /// Session tiers in canonical load and display order
    pub const SESSION: [Tier; 3] = [Tier::Global, Tier::Extension, Tier::Project];

    /// Fixed display form used in section headers and messages
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Global => "Global",
            Tier::Extension => "Extension",
            Tier::Project => "Project",
            Tier::Jit => "JIT",
        }
    }

    /// Parse a tier name case-insensitively. `environment` is accepted for `Project`.
    pub fn parse(name: &str) -> Option<Tier> {
        match name.trim().to_ascii_lowercase().as_str() {
            "global" => Some(Tier::Global),
            "extension" => Some(Tier::Extension),
            "project" | "environment" => Some(Tier::Project),
            "jit" => Some(Tier::Jit),
            _ => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One source file and its raw, untrimmed content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryFile {
    pub path: PathBuf,
    pub content: String,
}

impl MemoryFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Result of one tier load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierFiles {
    pub files: Vec<MemoryFile>,
}

impl TierFiles {
    pub fn new(files: Vec<MemoryFile>) -> Self {
        Self { files }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter().map(|f| &f.path)
    }
}

/// The three session tier strings, input to [`crate::composition::flatten_memory`].
///
/// A tier that was never loaded is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchicalMemory {
    pub global: String,
    pub extension: String,
    pub project: String,
}

impl HierarchicalMemory {
    /// Tier string by session tier. `Jit` has no stored string.
    pub fn get(&self, tier: Tier) -> &str {
        match tier {
            Tier::Global => &self.global,
            Tier::Extension => &self.extension,
            Tier::Project => &self.project,
            Tier::Jit => "",
        }
    }
}
