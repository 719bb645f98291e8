//! Session configuration handle consumed by the context manager.

use crate::config::StrataConfig;
use crate::tiers::{ExtensionLoader, InstructionSource, StaticExtensionLoader, StaticInstructions};
use crate::trust;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Read-only view of everything the manager needs from its environment
///
/// Built once per session and shared behind an `Arc`.
#[derive(Clone)]
pub struct SessionConfig {
    working_dir: PathBuf,
    debug: bool,
    trusted: bool,
    workspace_directories: Vec<PathBuf>,
    extensions: Arc<dyn ExtensionLoader>,
    instructions: Option<Arc<dyn InstructionSource>>,
}

impl SessionConfig {
    /// Untrusted session rooted at `working_dir` with no extensions.
    ///
    /// The working directory is the only workspace directory until
    /// [`with_workspace_directories`](Self::with_workspace_directories) says otherwise.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        Self {
            workspace_directories: vec![working_dir.clone()],
            working_dir,
            debug: false,
            trusted: false,
            extensions: Arc::new(StaticExtensionLoader::default()),
            instructions: None,
        }
    }

    /// Build a session from loaded configuration.
    ///
    /// `force_trust` overrides the configured trusted folders.
    pub fn from_config(working_dir: &Path, config: &StrataConfig, force_trust: bool) -> Self {
        let trusted = force_trust || trust::is_workspace_trusted(working_dir, &config.trust);

        let mut directories = vec![working_dir.to_path_buf()];
        for dir in &config.workspace.directories {
            let dir = if dir.is_absolute() {
                dir.clone()
            } else {
                working_dir.join(dir)
            };
            if !directories.contains(&dir) {
                directories.push(dir);
            }
        }

        let mut session = Self::new(working_dir)
            .with_debug(config.debug)
            .with_trusted(trusted)
            .with_workspace_directories(directories)
            .with_extensions(Arc::new(StaticExtensionLoader::new(
                config.extensions.iter().map(|e| e.to_extension()).collect(),
            )));
        if let Some(text) = &config.instructions.supplemental {
            session = session.with_instructions(Arc::new(StaticInstructions::new(text.clone())));
        }
        session
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_trusted(mut self, trusted: bool) -> Self {
        self.trusted = trusted;
        self
    }

    pub fn with_workspace_directories(mut self, directories: Vec<PathBuf>) -> Self {
        self.workspace_directories = directories;
        self
    }

    pub fn with_extensions(mut self, extensions: Arc<dyn ExtensionLoader>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_instructions(mut self, instructions: Arc<dyn InstructionSource>) -> Self {
        self.instructions = Some(instructions);
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn debug_mode(&self) -> bool {
        self.debug
    }

    pub fn is_trusted_folder(&self) -> bool {
        self.trusted
    }

    pub fn workspace_directories(&self) -> &[PathBuf] {
        &self.workspace_directories
    }

    pub fn extension_loader(&self) -> &dyn ExtensionLoader {
        self.extensions.as_ref()
    }

    pub fn instruction_source(&self) -> Option<&dyn InstructionSource> {
        self.instructions.as_deref()
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("working_dir", &self.working_dir)
            .field("debug", &self.debug)
            .field("trusted", &self.trusted)
            .field("workspace_directories", &self.workspace_directories)
            .field("extensions", &self.extensions.extensions().len())
            .field("instructions", &self.instructions.is_some())
            .finish()
    }
}
