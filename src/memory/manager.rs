//! Context manager: drives tier loading, trust gating, and deduplication.

use crate::composition::{append_supplement, concatenate_instructions, flatten_memory};
use crate::error::ApiError;
use crate::events::{MemoryChanged, MemoryEvents};
use crate::memory::registry::LoadedPathRegistry;
use crate::memory::session::SessionConfig;
use crate::tiers::TierSource;
use crate::types::{HierarchicalMemory, MemoryFile, Tier};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct MemoryState {
    registry: LoadedPathRegistry,
    memory: HierarchicalMemory,
}

/// Orchestrates the session tiers and on-demand JIT discovery
///
/// `refresh` and `discover_context` are serialized through an operation gate,
/// so a refresh never interleaves with a discovery on the same instance. The
/// accessors read the last computed state and never load anything.
pub struct ContextManager {
    config: Arc<SessionConfig>,
    source: Arc<dyn TierSource>,
    gate: tokio::sync::Mutex<()>,
    state: RwLock<MemoryState>,
    events: MemoryEvents,
}

impl ContextManager {
    pub fn new(config: Arc<SessionConfig>, source: Arc<dyn TierSource>) -> Self {
        Self {
            config,
            source,
            gate: tokio::sync::Mutex::new(()),
            state: RwLock::new(MemoryState::default()),
            events: MemoryEvents::new(),
        }
    }

    /// Reload the Global, Extension, and Project tiers from scratch.
    ///
    /// The new registry and tier strings are built aside and replace the
    /// stored state in one step once every tier has loaded. A loader failure
    /// aborts the refresh immediately: later tiers are not attempted, the
    /// previous state is kept, and no change notification is published.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let _op = self.gate.lock().await;
        let mut registry = LoadedPathRegistry::default();

        let global = self.load_global_memory(&mut registry).await?;
        let extension = self.load_extension_memory(&mut registry).await?;
        let project = self.load_environment_memory(&mut registry).await?;

        let file_count = registry.len();
        {
            let mut state = self.state.write();
            state.registry = registry;
            state.memory = HierarchicalMemory {
                global,
                extension,
                project,
            };
        }

        let delivered = self.events.emit(MemoryChanged { file_count });
        info!(file_count, subscribers = delivered, "Memory refreshed");
        Ok(())
    }

    /// Load memory for a path the agent just touched.
    ///
    /// Returns the concatenated content of files not seen before in this
    /// session, or an empty string when the workspace is untrusted or nothing
    /// new was found. The result is not folded into the stored tiers.
    /// Relative paths and roots resolve against the session working directory.
    pub async fn discover_context(
        &self,
        accessed_path: &Path,
        trusted_roots: &[PathBuf],
    ) -> Result<String, ApiError> {
        if !self.config.is_trusted_folder() {
            debug!(path = %accessed_path.display(), "Skipping JIT discovery in untrusted folder");
            return Ok(String::new());
        }

        let accessed_path = self.resolve(accessed_path);
        let trusted_roots: Vec<PathBuf> = trusted_roots.iter().map(|r| self.resolve(r)).collect();

        let _op = self.gate.lock().await;
        let already_loaded = self.state.read().registry.to_set();
        let result = self
            .source
            .load_jit(
                &accessed_path,
                &trusted_roots,
                &already_loaded,
                self.config.debug_mode(),
            )
            .await?;
        if result.is_empty() {
            return Ok(String::new());
        }

        let fresh = self.register_new(result.files);
        debug!(
            path = %accessed_path.display(),
            files = fresh.len(),
            "JIT discovery complete"
        );
        Ok(concatenate_instructions(&fresh, self.config.working_dir()))
    }

    async fn load_global_memory(
        &self,
        registry: &mut LoadedPathRegistry,
    ) -> Result<String, ApiError> {
        let result = self.source.load_global(self.config.debug_mode()).await?;
        let files = stage_new(registry, result.files);
        debug!(tier = %Tier::Global, files = files.len(), "Tier loaded");
        Ok(concatenate_instructions(&files, self.config.working_dir()))
    }

    async fn load_extension_memory(
        &self,
        registry: &mut LoadedPathRegistry,
    ) -> Result<String, ApiError> {
        let result = self
            .source
            .load_extension(self.config.extension_loader(), self.config.debug_mode())
            .await?;
        let files = stage_new(registry, result.files);
        debug!(tier = %Tier::Extension, files = files.len(), "Tier loaded");
        Ok(concatenate_instructions(&files, self.config.working_dir()))
    }

    async fn load_environment_memory(
        &self,
        registry: &mut LoadedPathRegistry,
    ) -> Result<String, ApiError> {
        if !self.config.is_trusted_folder() {
            debug!(tier = %Tier::Project, "Workspace untrusted; project memory disabled");
            return Ok(String::new());
        }

        let result = self
            .source
            .load_environment(
                self.config.workspace_directories(),
                self.config.extension_loader(),
                self.config.debug_mode(),
            )
            .await?;
        let files = stage_new(registry, result.files);
        let environment = concatenate_instructions(&files, self.config.working_dir());
        let supplemental = self
            .config
            .instruction_source()
            .map(|source| source.instructions())
            .unwrap_or_default();
        debug!(tier = %Tier::Project, files = files.len(), "Tier loaded");
        Ok(append_supplement(&environment, &supplemental))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.working_dir().join(path)
        }
    }

    /// Register `files` and keep only those whose path was not yet known
    fn register_new(&self, files: Vec<MemoryFile>) -> Vec<MemoryFile> {
        stage_new(&mut self.state.write().registry, files)
    }

    pub fn global_memory(&self) -> String {
        self.state.read().memory.global.clone()
    }

    pub fn extension_memory(&self) -> String {
        self.state.read().memory.extension.clone()
    }

    /// Project tier string, including any supplemental instructions
    pub fn environment_memory(&self) -> String {
        self.state.read().memory.project.clone()
    }

    /// All three session tier strings as last computed
    pub fn memory(&self) -> HierarchicalMemory {
        self.state.read().memory.clone()
    }

    /// Session tiers flattened into the final payload
    pub fn combined_memory(&self) -> String {
        flatten_memory(&self.state.read().memory)
    }

    pub fn loaded_paths(&self) -> BTreeSet<PathBuf> {
        self.state.read().registry.snapshot()
    }

    pub fn loaded_path_count(&self) -> usize {
        self.state.read().registry.len()
    }

    /// Subscribe to change notifications published after each refresh
    pub fn subscribe(&self) -> Receiver<MemoryChanged> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &Arc<SessionConfig> {
        &self.config
    }
}

/// Insert each file's path into `registry`, keeping only first sightings
fn stage_new(registry: &mut LoadedPathRegistry, files: Vec<MemoryFile>) -> Vec<MemoryFile> {
    files
        .into_iter()
        .filter(|file| registry.insert(file.path.clone()))
        .collect()
}
