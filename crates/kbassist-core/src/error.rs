//! Error types for kbassist.

use thiserror::Error;

/// Result type alias using kbassist's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for kbassist operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Generation backend unreachable or returned a fault
    #[error("Inference error: {0}")]
    Inference(String),

    /// Backend answered but broke the structured-output contract
    #[error("Unparseable model output: {0}")]
    UnparseableOutput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP client setup failed, or the gateway rejected our key or model
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure before any HTTP status
    #[error("Request error: {0}")]
    Request(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
