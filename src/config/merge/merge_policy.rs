//! Merge rules: defaults, override order, conflict handling.
//!
//! List-valued keys are replaced wholesale by a higher-precedence source,
//! never concatenated.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("debug", false)?
        .set_default("memory.max_scan_depth", 3_i64)?
        .set_default("trust.trust_all", false)
}
