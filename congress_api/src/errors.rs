//! Error types for congress.gov API operations.

use thiserror::Error;

/// Errors from congress.gov API operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("rate limited by congress.gov (HTTP 429)")]
    RateLimited,
    #[error("invalid API key (HTTP 403)")]
    InvalidApiKey,
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
