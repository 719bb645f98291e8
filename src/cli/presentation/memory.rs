//! Memory presentation: status and loaded-path listings.

use crate::cli::presentation::shared::format_section_heading;
use crate::composition::display_path;
use crate::error::ApiError;
use crate::memory::ContextManager;
use crate::types::Tier;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Size of one session tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierStatus {
    pub tier: Tier,
    pub chars: usize,
    pub lines: usize,
}

/// Snapshot of a context manager after refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStatus {
    pub working_dir: PathBuf,
    pub trusted: bool,
    pub file_count: usize,
    pub combined_chars: usize,
    pub tiers: Vec<TierStatus>,
}

impl MemoryStatus {
    pub fn from_manager(manager: &ContextManager) -> Self {
        let memory = manager.memory();
        let tiers = Tier::SESSION
            .iter()
            .map(|tier| {
                let text = memory.get(*tier);
                TierStatus {
                    tier: *tier,
                    chars: text.chars().count(),
                    lines: text.lines().count(),
                }
            })
            .collect();
        Self {
            working_dir: manager.config().working_dir().to_path_buf(),
            trusted: manager.config().is_trusted_folder(),
            file_count: manager.loaded_path_count(),
            combined_chars: manager.combined_memory().chars().count(),
            tiers,
        }
    }
}

/// Format status as human-readable text (comfy-table + section heading).
pub fn format_status_text(status: &MemoryStatus) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Memory Status")));
    out.push_str(&format!("  Workspace: {}\n", status.working_dir.display()));
    out.push_str(&format!(
        "  Trusted: {}\n",
        if status.trusted { "yes" } else { "no" }
    ));
    out.push_str(&format!("  Files loaded: {}\n\n", status.file_count));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Tier", "Chars", "Lines"]);
    for row in &status.tiers {
        table.add_row(vec![
            row.tier.label().to_string(),
            row.chars.to_string(),
            row.lines.to_string(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out.push_str(&format!("  Combined: {} chars", status.combined_chars));
    out
}

pub fn format_status_json(status: &MemoryStatus) -> Result<String, ApiError> {
    serde_json::to_string_pretty(status).map_err(|e| ApiError::InvalidArgument(e.to_string()))
}

/// Format loaded paths as a table, relative to `working_dir` where possible.
pub fn format_paths_text(paths: &BTreeSet<PathBuf>, working_dir: &Path) -> String {
    if paths.is_empty() {
        return "No memory files loaded.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["#", "Path"]);
    for (i, path) in paths.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), display_path(path, working_dir)]);
    }
    table.to_string()
}

pub fn format_paths_json(paths: &BTreeSet<PathBuf>) -> Result<String, ApiError> {
    let arr: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    serde_json::to_string_pretty(&serde_json::json!({
        "file_count": arr.len(),
        "paths": arr,
    }))
    .map_err(|e| ApiError::InvalidArgument(e.to_string()))
}
