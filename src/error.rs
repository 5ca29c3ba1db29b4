//! Error types for the digest bot

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DigestError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Delivery error: {0}")]
    Delivery(String),
}

pub type Result<T> = std::result::Result<T, DigestError>;
