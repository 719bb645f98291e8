//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the context manager.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_paths_json, format_paths_text, format_section_heading, format_status_json,
    format_status_text, MemoryStatus, TierStatus,
};
pub use route::{RunContext, RunOptions};
