//! Hierarchical memory: session configuration, loaded-path registry, and the
//! context manager that composes tier content for an agent session.

mod manager;
mod registry;
mod session;

pub use manager::ContextManager;
pub use registry::LoadedPathRegistry;
pub use session::SessionConfig;
