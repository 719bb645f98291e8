//! Error types for the Strata context composition engine.

use crate::types::Tier;
use thiserror::Error;

/// Errors surfaced by tier loading, configuration, and the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{tier} tier loader failed: {message}")]
    LoaderFailed { tier: Tier, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Discovery task failed: {0}")]
    TaskFailed(String),
}

impl ApiError {
    /// Shorthand for a loader failure attributed to a tier
    pub fn loader(tier: Tier, message: impl Into<String>) -> Self {
        ApiError::LoaderFailed {
            tier,
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::TaskFailed(err.to_string())
    }
}
