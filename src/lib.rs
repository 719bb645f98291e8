//! Strata: Hierarchical Instruction Context Composition
//!
//! Discovers instruction files for a coding agent across four tiers (Global,
//! Extension, Project, and on-demand JIT), deduplicates them by path, and
//! flattens the session tiers into a single labeled payload.

pub mod cli;
pub mod composition;
pub mod config;
pub mod discovery;
pub mod error;
pub mod events;
pub mod logging;
pub mod memory;
pub mod tiers;
pub mod trust;
pub mod types;

pub use composition::flatten_memory;
pub use error::ApiError;
pub use memory::{ContextManager, SessionConfig};
pub use types::{HierarchicalMemory, MemoryFile, Tier, TierFiles};
