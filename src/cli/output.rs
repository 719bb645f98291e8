//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain errors to a message for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::LoaderFailed { tier, message } => format!(
            "Failed to load {} memory: {}",
            tier.label().to_lowercase(),
            message
        ),
        ApiError::ConfigError(msg) => format!(
            "Configuration error: {}\nCheck .strata/config.toml or ~/.config/strata/config.toml.",
            msg
        ),
        other => other.to_string(),
    }
}
