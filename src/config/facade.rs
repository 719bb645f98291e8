//! Config loader facade: assembles sources in precedence order.

use super::merge::merge_policy;
use super::sources::{env_vars, global_file, workspace_file};
use super::StrataConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};

/// Entry point for loading [`StrataConfig`]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (highest last): defaults, global file, workspace
    /// `.strata/config.toml`, workspace `.strata/{STRATA_ENV}.toml`,
    /// `STRATA__*` environment variables.
    pub fn load(workspace_root: &Path) -> Result<StrataConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = env_vars::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Load a single configuration file over the defaults, ignoring other sources.
    pub fn load_from_file(path: &Path) -> Result<StrataConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()
    }

    /// Location of the global config file, if a home directory is known
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
