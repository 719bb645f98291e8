//! Filesystem Tier Source
//!
//! Concrete [`TierSource`] backed by the local filesystem. Each tier looks for
//! the configured memory file names (`STRATA.md`, `AGENTS.md` by default):
//!
//! - **Global**: directly inside the global memory directory (`~/.strata`).
//! - **Extension**: each active extension's declared context files, or the
//!   memory files at the extension root when none are declared.
//! - **Project**: for each workspace directory, every directory from the
//!   project root (nearest `.git` ancestor) down to the workspace directory,
//!   then a bounded scan below it.
//! - **JIT**: every directory from the accessed path up to the deepest trusted
//!   root containing it. Paths outside all trusted roots load nothing.
//!
//! Blocking I/O runs on tokio's blocking pool. Any failure surfaces as
//! [`ApiError::LoaderFailed`] naming the tier.

use crate::config::MemoryConfig;
use crate::error::ApiError;
use crate::tiers::{Extension, ExtensionLoader, TierSource};
use crate::types::{MemoryFile, Tier, TierFiles};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

mod scan;
mod walk;

pub use scan::{ancestors_until, canonical, containing_root, find_project_root};
pub use walk::{Walker, WalkerConfig};

use scan::{read_memory_file, read_memory_files_in};

/// Filesystem-backed tier loader
#[derive(Debug, Clone)]
pub struct FsTierSource {
    config: MemoryConfig,
}

impl FsTierSource {
    pub fn new(config: MemoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }
}

#[async_trait]
impl TierSource for FsTierSource {
    async fn load_global(&self, debug: bool) -> Result<TierFiles, ApiError> {
        let config = self.config.clone();
        let files = run_blocking(Tier::Global, move || global_files(&config, debug)).await?;
        Ok(TierFiles::new(files))
    }

    async fn load_extension(
        &self,
        extensions: &dyn ExtensionLoader,
        debug: bool,
    ) -> Result<TierFiles, ApiError> {
        let config = self.config.clone();
        let active = extensions.active_extensions();
        let files =
            run_blocking(Tier::Extension, move || extension_files(&config, &active, debug)).await?;
        Ok(TierFiles::new(files))
    }

    async fn load_environment(
        &self,
        directories: &[PathBuf],
        extensions: &dyn ExtensionLoader,
        debug: bool,
    ) -> Result<TierFiles, ApiError> {
        let config = self.config.clone();
        let directories = directories.to_vec();
        let active = extensions.active_extensions();
        let files = run_blocking(Tier::Project, move || {
            environment_files(&config, &directories, &active, debug)
        })
        .await?;
        Ok(TierFiles::new(files))
    }

    async fn load_jit(
        &self,
        accessed_path: &Path,
        trusted_roots: &[PathBuf],
        already_loaded: &HashSet<PathBuf>,
        debug: bool,
    ) -> Result<TierFiles, ApiError> {
        let config = self.config.clone();
        let accessed_path = accessed_path.to_path_buf();
        let trusted_roots = trusted_roots.to_vec();
        let already_loaded = already_loaded.clone();
        let files = run_blocking(Tier::Jit, move || {
            jit_files(&config, &accessed_path, &trusted_roots, &already_loaded, debug)
        })
        .await?;
        Ok(TierFiles::new(files))
    }
}

/// Run a tier scan on the blocking pool; any failure is attributed to `tier`.
async fn run_blocking<F>(tier: Tier, scan: F) -> Result<Vec<MemoryFile>, ApiError>
where
    F: FnOnce() -> Result<Vec<MemoryFile>, ApiError> + Send + 'static,
{
    let result = match tokio::task::spawn_blocking(scan).await {
        Ok(result) => result,
        Err(join_error) => Err(ApiError::from(join_error)),
    };
    result.map_err(|e| ApiError::loader(tier, e.to_string()))
}

fn global_files(config: &MemoryConfig, debug: bool) -> Result<Vec<MemoryFile>, ApiError> {
    let Some(dir) = config.resolve_global_dir() else {
        warn!("No home directory found; global memory disabled");
        return Ok(Vec::new());
    };
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let files = read_memory_files_in(&canonical(&dir), &config.file_names)?;
    trace_files(Tier::Global, &files, debug);
    Ok(files)
}

fn extension_files(
    config: &MemoryConfig,
    extensions: &[Extension],
    debug: bool,
) -> Result<Vec<MemoryFile>, ApiError> {
    let mut files = Vec::new();
    let mut seen = HashSet::new();

    for extension in extensions {
        let found = if extension.context_files.is_empty() {
            if extension.path.is_dir() {
                read_memory_files_in(&canonical(&extension.path), &config.file_names)?
            } else {
                Vec::new()
            }
        } else {
            let mut declared = Vec::new();
            for file in &extension.context_files {
                let path = if file.is_absolute() {
                    file.clone()
                } else {
                    extension.path.join(file)
                };
                if !path.is_file() {
                    warn!(
                        extension = %extension.name,
                        path = %path.display(),
                        "Extension context file not found"
                    );
                    continue;
                }
                declared.push(read_memory_file(&path)?);
            }
            declared
        };

        files.extend(found.into_iter().filter(|f| seen.insert(f.path.clone())));
    }

    trace_files(Tier::Extension, &files, debug);
    Ok(files)
}

fn environment_files(
    config: &MemoryConfig,
    directories: &[PathBuf],
    extensions: &[Extension],
    debug: bool,
) -> Result<Vec<MemoryFile>, ApiError> {
    let mut excluded: HashSet<PathBuf> = HashSet::new();
    if let Some(global_dir) = config.resolve_global_dir() {
        let global_dir = canonical(&global_dir);
        excluded.extend(config.file_names.iter().map(|n| global_dir.join(n)));
    }
    for extension in extensions {
        excluded.extend(
            extension
                .context_files
                .iter()
                .map(|f| canonical(&extension.path.join(f))),
        );
    }

    let walker_config = WalkerConfig {
        ignore_dirs: config.ignore_dirs.clone(),
        max_depth: config.max_scan_depth,
        ..WalkerConfig::default()
    };

    let mut files = Vec::new();
    let mut seen = HashSet::new();
    for directory in directories {
        if !directory.is_dir() {
            warn!(path = %directory.display(), "Workspace directory does not exist; skipping");
            continue;
        }
        let directory = canonical(directory);
        let root = find_project_root(&directory);

        let mut candidates = ancestors_until(&directory, &root);
        if config.max_scan_depth > 0 {
            candidates.extend(Walker::with_config(directory.clone(), walker_config.clone()).directories()?);
        }

        for candidate in candidates {
            for file in read_memory_files_in(&candidate, &config.file_names)? {
                if excluded.contains(&file.path) || !seen.insert(file.path.clone()) {
                    continue;
                }
                files.push(file);
            }
        }
    }

    trace_files(Tier::Project, &files, debug);
    Ok(files)
}

fn jit_files(
    config: &MemoryConfig,
    accessed_path: &Path,
    trusted_roots: &[PathBuf],
    already_loaded: &HashSet<PathBuf>,
    debug: bool,
) -> Result<Vec<MemoryFile>, ApiError> {
    let accessed = canonical(accessed_path);
    let start = if accessed.is_file() {
        accessed
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| accessed.clone())
    } else {
        accessed
    };

    let Some(root) = containing_root(&start, trusted_roots) else {
        debug!(path = %start.display(), "Accessed path is outside every trusted root");
        return Ok(Vec::new());
    };

    let mut files = Vec::new();
    for dir in ancestors_until(&start, &root) {
        for file in read_memory_files_in(&dir, &config.file_names)? {
            if already_loaded.contains(&file.path) {
                continue;
            }
            files.push(file);
        }
    }

    trace_files(Tier::Jit, &files, debug);
    Ok(files)
}

fn trace_files(tier: Tier, files: &[MemoryFile], debug: bool) {
    if !debug {
        return;
    }
    for file in files {
        debug!(tier = %tier, path = %file.path.display(), bytes = file.content.len(), "Discovered memory file");
    }
}
