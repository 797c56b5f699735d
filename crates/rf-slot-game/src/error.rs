//! Error types for the slot game core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias
pub type SlotResult<T> = Result<T, SlotError>;
