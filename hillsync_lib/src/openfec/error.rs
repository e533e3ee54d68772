//! Error types for OpenFEC API operations.

use thiserror::Error;

/// Errors from OpenFEC API operations.
#[derive(Error, Debug)]
pub enum OpenFecError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("rate limited by OpenFEC (HTTP 429)")]
    RateLimited,
    #[error("invalid API key (HTTP 403)")]
    InvalidApiKey,
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
}
