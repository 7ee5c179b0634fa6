//! Catalog API error types

use thiserror::Error;

/// Catalog client errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No bearer token configured for the catalog API
    #[error("catalog API token is missing")]
    MissingToken,

    /// Invalid input provided to a client method
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("failed to parse catalog response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog API returned an error payload
    #[error("catalog API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Requested artist was not found
    #[error("artist not found: {0}")]
    ArtistNotFound(String),

    /// Requested playlist was not found
    #[error("playlist not found: {0}")]
    PlaylistNotFound(String),

    /// Rate limited by the catalog API
    #[error("rate limited by catalog API")]
    RateLimited,

    /// The caller is not authenticated against the catalog
    #[error("not authenticated with the catalog API")]
    Unauthenticated,

    /// Request timed out
    #[error("request to catalog API timed out")]
    Timeout,
}

impl CatalogError {
    /// Whether this error is transient and worth retrying.
    ///
    /// Retries on timeouts, rate limiting, connect failures, and 5xx
    /// responses. Never retries on 4xx (other than 429) or parse errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Timeout | CatalogError::RateLimited => true,
            CatalogError::Http(e) => {
                if e.is_timeout() || e.is_connect() {
                    return true;
                }
                matches!(e.status(), Some(status) if status.is_server_error())
            }
            CatalogError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
