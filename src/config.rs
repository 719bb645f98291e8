//! Configuration System
//!
//! Layered configuration built on the `config` crate. Sources merge from lowest
//! to highest precedence: built-in defaults, the global user file, workspace
//! files, then `STRATA__`-prefixed environment variables.

use crate::logging::LoggingConfig;
use crate::tiers::Extension;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrataConfig {
    /// Memory file discovery settings
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Trusted folder settings
    #[serde(default)]
    pub trust: TrustConfig,

    /// Additional workspace directories
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Installed extensions
    #[serde(default)]
    pub extensions: Vec<ExtensionConfig>,

    /// Supplemental instructions appended to project memory
    #[serde(default)]
    pub instructions: InstructionsConfig,

    /// Verbose discovery tracing
    #[serde(default)]
    pub debug: bool,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Memory file discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// File names treated as memory files, checked in order in each directory
    #[serde(default = "default_file_names")]
    pub file_names: Vec<String>,

    /// Directory holding global memory files (defaults to ~/.strata)
    #[serde(default)]
    pub global_dir: Option<PathBuf>,

    /// How deep to scan below each workspace directory
    #[serde(default = "default_max_scan_depth")]
    pub max_scan_depth: usize,

    /// Directory names never scanned
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,
}

fn default_file_names() -> Vec<String> {
    vec!["STRATA.md".to_string(), "AGENTS.md".to_string()]
}

fn default_max_scan_depth() -> usize {
    3
}

fn default_ignore_dirs() -> Vec<String> {
    vec![
        ".git".to_string(),
        "target".to_string(),
        "node_modules".to_string(),
        ".cargo".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            file_names: default_file_names(),
            global_dir: None,
            max_scan_depth: default_max_scan_depth(),
            ignore_dirs: default_ignore_dirs(),
        }
    }
}

impl MemoryConfig {
    /// Global memory directory: the configured one, else `~/.strata`
    pub fn resolve_global_dir(&self) -> Option<PathBuf> {
        self.global_dir.clone().or_else(|| {
            directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".strata"))
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.file_names.is_empty() {
            return Err("At least one memory file name is required".to_string());
        }
        for name in &self.file_names {
            if name.trim().is_empty() {
                return Err("Memory file names cannot be empty".to_string());
            }
            if name.contains('/') || name.contains('\\') {
                return Err(format!(
                    "Memory file name '{}' must not contain path separators",
                    name
                ));
            }
        }
        Ok(())
    }
}

/// Trusted folder settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Folders (and their descendants) where project memory may load
    #[serde(default)]
    pub trusted_folders: Vec<PathBuf>,

    /// Trust every folder
    #[serde(default)]
    pub trust_all: bool,
}

/// Workspace directory settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Directories added to the working directory; relative paths resolve against it
    #[serde(default)]
    pub directories: Vec<PathBuf>,
}

/// One installed extension
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionConfig {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub context_files: Vec<PathBuf>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ExtensionConfig {
    pub fn to_extension(&self) -> Extension {
        Extension {
            name: self.name.clone(),
            path: self.path.clone(),
            context_files: self.context_files.clone(),
            active: self.enabled,
        }
    }
}

/// Supplemental instruction settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstructionsConfig {
    /// Text appended after the project memory
    #[serde(default)]
    pub supplemental: Option<String>,
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Memory(String),
    Extension(String, String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Memory(msg) => write!(f, "Memory: {}", msg),
            ValidationError::Extension(name, msg) => write!(f, "Extension '{}': {}", name, msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl StrataConfig {
    /// Validate the entire configuration, collecting every problem
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.memory.validate() {
            errors.push(ValidationError::Memory(e));
        }

        let mut names = HashSet::new();
        for extension in &self.extensions {
            if extension.name.trim().is_empty() {
                errors.push(ValidationError::Extension(
                    extension.path.display().to_string(),
                    "Extension name cannot be empty".to_string(),
                ));
            } else if !names.insert(extension.name.as_str()) {
                errors.push(ValidationError::Extension(
                    extension.name.clone(),
                    "Duplicate extension name".to_string(),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
