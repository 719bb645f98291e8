//! CLI command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name string recorded on log lines (e.g. "show", "discover").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Show { .. } => "show",
        Commands::Paths { .. } => "paths",
        Commands::Discover { .. } => "discover",
        Commands::Status { .. } => "status",
    }
}
