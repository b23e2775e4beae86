//! Error types for chain operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {path} failed: HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("API error: {0}")]
    Api(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to fetch {source_name}: {message}")]
    Provider {
        source_name: String,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
