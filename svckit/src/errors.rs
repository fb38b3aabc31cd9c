use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: HTTP {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Timeout error: operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ContentError {
    /// Transport-level failures, as opposed to the backend answering with an error.
    pub fn is_transport(&self) -> bool {
        matches!(self, ContentError::Network(_) | ContentError::Timeout(_))
    }
}

impl From<reqwest::Error> for ContentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ContentError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ContentError::Backend {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ContentError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::Decode(err.to_string())
    }
}

impl From<config::ConfigError> for ContentError {
    fn from(err: config::ConfigError) -> Self {
        ContentError::Config(err.to_string())
    }
}

impl From<anyhow::Error> for ContentError {
    fn from(err: anyhow::Error) -> Self {
        ContentError::Unknown(err.to_string())
    }
}
