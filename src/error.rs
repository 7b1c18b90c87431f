//! Error types for loading diagrams and configuration

use thiserror::Error;

/// Errors that can occur when reading a diagram model or a config file
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse diagram JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
