//! Tier Sources
//!
//! Capability interfaces consumed by the context manager. A [`TierSource`]
//! knows how to enumerate the memory files for each tier; the manager never
//! inspects how they were found. [`ExtensionLoader`] and [`InstructionSource`]
//! are the other collaborators exposed through the session configuration.

use crate::error::ApiError;
use crate::types::TierFiles;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

mod extension;
mod instructions;

pub use extension::{Extension, ExtensionLoader, StaticExtensionLoader};
pub use instructions::{InstructionSource, StaticInstructions};

/// Loader for the four tiers of memory files
///
/// Every method may fail; the manager propagates failures unchanged.
/// Returned paths must be stable identifiers so they can be deduplicated.
#[async_trait]
pub trait TierSource: Send + Sync {
    /// User-level memory files
    async fn load_global(&self, debug: bool) -> Result<TierFiles, ApiError>;

    /// Context files contributed by active extensions
    async fn load_extension(
        &self,
        extensions: &dyn ExtensionLoader,
        debug: bool,
    ) -> Result<TierFiles, ApiError>;

    /// Project memory across every workspace directory
    async fn load_environment(
        &self,
        directories: &[PathBuf],
        extensions: &dyn ExtensionLoader,
        debug: bool,
    ) -> Result<TierFiles, ApiError>;

    /// Memory files between `accessed_path` and its trusted root
    ///
    /// Files whose path is in `already_loaded` should be skipped.
    async fn load_jit(
        &self,
        accessed_path: &Path,
        trusted_roots: &[PathBuf],
        already_loaded: &HashSet<PathBuf>,
        debug: bool,
    ) -> Result<TierFiles, ApiError>;
}
