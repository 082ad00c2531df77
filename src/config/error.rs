//! Configuration error types.

use thiserror::Error;

/// Configuration loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("{broker} credentials not found (set {prefix}_API_KEY and {prefix}_API_SECRET)")]
    MissingCredentials { broker: String, prefix: String },
    #[error("validation failed: {0}")]
    Validation(String),
}
