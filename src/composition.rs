//! Memory Composition
//!
//! Pure formatting over opaque text blocks. Two laws live here:
//!
//! - [`flatten_memory`] merges the three session tier strings into the final payload.
//! - [`concatenate_instructions`] merges the files of one tier into that tier's string.
//!
//! Both add headers only when more than one block survives trimming, so a lone
//! block is always passed through verbatim (trimmed). Nothing here touches the
//! filesystem or shared state.

use crate::types::{HierarchicalMemory, MemoryFile, Tier};
use std::path::Path;

/// Flatten the session tiers into a single string.
///
/// Empty and whitespace-only tiers are dropped. With one tier left its trimmed
/// content is returned without a header; with two or more, each block is
/// introduced by `--- <Label> ---` in Global, Extension, Project order and
/// blocks are separated by exactly one blank line.
pub fn flatten_memory(memory: &HierarchicalMemory) -> String {
    let blocks: Vec<(Tier, &str)> = Tier::SESSION
        .iter()
        .map(|tier| (*tier, memory.get(*tier).trim()))
        .filter(|(_, content)| !content.is_empty())
        .collect();

    match blocks.as_slice() {
        [] => String::new(),
        [(_, only)] => (*only).to_string(),
        _ => blocks
            .iter()
            .map(|(tier, content)| format!("--- {} ---\n\n{}", tier.label(), content))
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

/// Concatenate the files of one tier into its tier string.
///
/// Whitespace-only files are skipped. A single surviving file yields its trimmed
/// content as-is; several files are each wrapped in source markers naming the
/// file relative to `working_dir`.
pub fn concatenate_instructions(files: &[MemoryFile], working_dir: &Path) -> String {
    let blocks: Vec<(&MemoryFile, &str)> = files
        .iter()
        .map(|file| (file, file.content.trim()))
        .filter(|(_, content)| !content.is_empty())
        .collect();

    match blocks.as_slice() {
        [] => String::new(),
        [(_, only)] => (*only).to_string(),
        _ => blocks
            .iter()
            .map(|(file, content)| {
                let display = display_path(&file.path, working_dir);
                format!(
                    "--- Context from: {display} ---\n{content}\n--- End of Context from: {display} ---"
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

/// Append supplemental text to a tier string, separated by a blank line.
///
/// The supplement is left-trimmed first; an empty supplement leaves `base` unchanged.
pub fn append_supplement(base: &str, supplement: &str) -> String {
    let supplement = supplement.trim_start();
    match (base.is_empty(), supplement.is_empty()) {
        (_, true) => base.to_string(),
        (true, false) => supplement.to_string(),
        (false, false) => format!("{}\n\n{}", base, supplement),
    }
}

/// Display form of a source path: relative to `working_dir` when beneath it.
pub fn display_path(path: &Path, working_dir: &Path) -> String {
    if path.is_absolute() {
        if let Ok(relative) = path.strip_prefix(working_dir) {
            if !relative.as_os_str().is_empty() {
                return relative.display().to_string();
            }
        }
    }
    path.display().to_string()
}
