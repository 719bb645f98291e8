//! Per-directory memory file lookup and upward traversal helpers.

use crate::error::ApiError;
use crate::types::MemoryFile;
use std::fs;
use std::path::{Path, PathBuf};

/// Canonical form used as the stable identifier of a path
pub fn canonical(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Read every memory file present directly in `dir`, in `file_names` order.
pub fn read_memory_files_in(dir: &Path, file_names: &[String]) -> Result<Vec<MemoryFile>, ApiError> {
    let mut files = Vec::new();
    for name in file_names {
        let candidate = dir.join(name);
        if !candidate.is_file() {
            continue;
        }
        files.push(read_memory_file(&candidate)?);
    }
    Ok(files)
}

/// Read one file; the error names the path that failed.
pub fn read_memory_file(path: &Path) -> Result<MemoryFile, ApiError> {
    let content = fs::read_to_string(path).map_err(|e| {
        ApiError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", path.display(), e),
        ))
    })?;
    Ok(MemoryFile::new(canonical(path), content))
}

/// Nearest ancestor of `dir` (inclusive) holding a `.git` entry, else `dir` itself.
pub fn find_project_root(dir: &Path) -> PathBuf {
    dir.ancestors()
        .find(|ancestor| ancestor.join(".git").exists())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dir.to_path_buf())
}

/// Directories from `stop` down to `start`, both inclusive, outermost first.
///
/// When `start` is not beneath `stop` the walk continues to the filesystem root.
pub fn ancestors_until(start: &Path, stop: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for dir in start.ancestors() {
        dirs.push(dir.to_path_buf());
        if dir == stop {
            break;
        }
    }
    dirs.reverse();
    dirs
}

/// Deepest trusted root containing `path`, if any
pub fn containing_root(path: &Path, roots: &[PathBuf]) -> Option<PathBuf> {
    roots
        .iter()
        .map(|root| canonical(root))
        .filter(|root| path.starts_with(root))
        .max_by_key(|root| root.components().count())
}
