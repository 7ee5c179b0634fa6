//! Core pipeline error types

use playlist_scout_catalog_client::CatalogError;
use thiserror::Error;

/// Errors produced by the discovery-and-enqueue pipeline
#[derive(Error, Debug)]
pub enum CoreError {
    /// Query string was empty or whitespace-only
    #[error("query cannot be empty")]
    EmptyQuery,

    /// The fuzzy resolver found no candidate worth reporting
    #[error("no match found for '{0}'")]
    NoMatch(String),

    /// A CSS selector was syntactically invalid
    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    /// A selector matched nothing in the document
    #[error("selector matched no elements")]
    NoElements,

    /// The remote page could not be fetched within the retry budget
    #[error("failed to fetch {url}: {message}")]
    FetchFailed { url: String, message: String },

    /// The fetch exceeded its deadline
    #[error("fetch of {0} timed out")]
    FetchTimeout(String),

    /// The fetched body exceeded the configured size limit
    #[error("response body exceeded maximum content size of {0} bytes")]
    ContentTooLarge(usize),

    /// Underlying catalog client error
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Result type for core pipeline operations
pub type CoreResult<T> = Result<T, CoreError>;
