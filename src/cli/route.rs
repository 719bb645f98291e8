//! CLI route: single route table and run context. Dispatches to the context manager and presentation.

use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_paths_json, format_paths_text, format_status_json, format_status_text, MemoryStatus,
};
use crate::cli::command_name;
use crate::config::{ConfigLoader, StrataConfig};
use crate::discovery::FsTierSource;
use crate::error::ApiError;
use crate::memory::{ContextManager, SessionConfig};
use crate::types::Tier;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Session overrides taken from CLI flags
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Trust the workspace regardless of configured trusted folders
    pub force_trust: bool,
    /// Enable discovery tracing even when the config leaves it off
    pub debug: bool,
}

/// Runtime context for CLI execution: workspace, loaded config, and the context manager.
pub struct RunContext {
    manager: ContextManager,
    workspace_root: PathBuf,
    config: StrataConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        options: RunOptions,
    ) -> Result<Self, ApiError> {
        let workspace_root = dunce::canonicalize(&workspace_root).map_err(|e| {
            ApiError::InvalidPath(format!("{}: {}", workspace_root.display(), e))
        })?;

        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;

        let session = SessionConfig::from_config(&workspace_root, &config, options.force_trust);
        let session = if options.debug {
            session.with_debug(true)
        } else {
            session
        };
        let source = FsTierSource::new(config.memory.clone());
        let manager = ContextManager::new(Arc::new(session), Arc::new(source));

        Ok(Self {
            manager,
            workspace_root,
            config,
        })
    }

    pub fn manager(&self) -> &ContextManager {
        &self.manager
    }

    pub fn config(&self) -> &StrataConfig {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Execute a command on a fresh runtime and return its stdout payload.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| ApiError::TaskFailed(format!("Failed to create runtime: {}", e)))?;
        let started = Instant::now();
        let result = rt.block_on(self.execute_async(command));
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    /// Execute a command on the caller's runtime.
    pub async fn execute_async(&self, command: &Commands) -> Result<String, ApiError> {
        self.manager.refresh().await?;

        match command {
            Commands::Show { tier } => self.handle_show(tier),
            Commands::Paths { format } => {
                let paths = self.manager.loaded_paths();
                if format == "json" {
                    format_paths_json(&paths)
                } else {
                    Ok(format_paths_text(&paths, &self.workspace_root))
                }
            }
            Commands::Discover { path, roots } => self.handle_discover(path, roots).await,
            Commands::Status { format } => {
                let status = MemoryStatus::from_manager(&self.manager);
                if format == "json" {
                    format_status_json(&status)
                } else {
                    Ok(format_status_text(&status))
                }
            }
        }
    }

    fn handle_show(&self, tier: &str) -> Result<String, ApiError> {
        if tier.eq_ignore_ascii_case("all") {
            return Ok(self.manager.combined_memory());
        }
        match Tier::parse(tier) {
            Some(Tier::Global) => Ok(self.manager.global_memory()),
            Some(Tier::Extension) => Ok(self.manager.extension_memory()),
            Some(Tier::Project) => Ok(self.manager.environment_memory()),
            Some(Tier::Jit) => Err(ApiError::InvalidArgument(
                "JIT memory is not stored; use `strata discover <path>`".to_string(),
            )),
            None => Err(ApiError::InvalidArgument(format!(
                "Unknown tier '{}' (expected global, extension, project, or all)",
                tier
            ))),
        }
    }

    async fn handle_discover(&self, path: &Path, roots: &[PathBuf]) -> Result<String, ApiError> {
        let accessed = self.resolve(path);
        let roots: Vec<PathBuf> = if roots.is_empty() {
            self.manager.config().workspace_directories().to_vec()
        } else {
            roots.iter().map(|root| self.resolve(root)).collect()
        };
        self.manager.discover_context(&accessed, &roots).await
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        }
    }
}
