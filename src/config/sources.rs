//! Configuration sources, one module per origin.

pub mod env_vars;
pub mod global_file;
pub mod workspace_file;
