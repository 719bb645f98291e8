//! CLI presentation: text and json formatters per command family.

mod memory;
mod shared;

pub use memory::{
    format_paths_json, format_paths_text, format_status_json, format_status_text, MemoryStatus,
    TierStatus,
};
pub use shared::format_section_heading;
