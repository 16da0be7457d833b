//! Error types for pinpod-core

use thiserror::Error;

/// Main error type for the pinpod-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Analytics collection endpoint error
    #[error("collector error: {0}")]
    Collector(String),

    /// Registration backend error
    #[error("backend error: {0}")]
    Backend(String),

    /// Early-access form failed validation
    #[error("{0}")]
    Validation(#[from] crate::registration::ValidationError),
}

/// Result type alias for pinpod-core
pub type Result<T> = std::result::Result<T, Error>;
