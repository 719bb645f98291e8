//! CLI parse: clap types for Strata. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strata CLI - compose hierarchical instruction context for coding agents
#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Compose hierarchical instruction context for coding agents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Treat the workspace as trusted regardless of configured trusted folders
    #[arg(long)]
    pub trust: bool,

    /// Enable verbose logging and discovery tracing
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print composed memory (one tier or the combined payload)
    Show {
        /// Tier to print: global, extension, project, or all
        #[arg(long, default_value = "all")]
        tier: String,
    },
    /// List every source file incorporated by a refresh
    Paths {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Load just-in-time memory for a path the agent is about to touch
    Discover {
        /// Accessed file or directory (relative paths resolve against the workspace)
        path: PathBuf,
        /// Trusted root bounding the upward walk (repeatable; defaults to workspace directories)
        #[arg(long = "root")]
        roots: Vec<PathBuf>,
    },
    /// Show per-tier sizes, trust, and file count
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
