//! Extension registry port.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An installed extension and the context files it ships
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub context_files: Vec<PathBuf>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Supplies the installed extensions
pub trait ExtensionLoader: Send + Sync {
    /// All installed extensions, active or not, in load order
    fn extensions(&self) -> Vec<Extension>;

    /// Active extensions only
    fn active_extensions(&self) -> Vec<Extension> {
        self.extensions().into_iter().filter(|e| e.active).collect()
    }
}

/// Fixed extension list, typically built from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticExtensionLoader {
    extensions: Vec<Extension>,
}

impl StaticExtensionLoader {
    pub fn new(extensions: Vec<Extension>) -> Self {
        Self { extensions }
    }
}

impl ExtensionLoader for StaticExtensionLoader {
    fn extensions(&self) -> Vec<Extension> {
        self.extensions.clone()
    }
}
