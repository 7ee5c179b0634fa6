//! Error taxonomy for the playlist-scout API
//!
//! A single `ApiError` enum maps validation, rate limiting, CSRF, and
//! upstream errors onto HTTP status codes and a stable `error_code()`
//! via `status_code()` / `error_code()` / `IntoResponse`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use playlist_scout_catalog_client::CatalogError;
use playlist_scout_core::CoreError;
use serde::Serialize;
use thiserror::Error;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed input: empty field, oversized body, unknown JSON field,
    /// suspicious-pattern hit
    #[error("validation error: {0}")]
    Validation(String),

    /// CSRF token missing or invalid on a state-changing request
    #[error("CSRF token missing or invalid")]
    CsrfInvalid,

    /// The per-IP token bucket is empty
    #[error("rate limit exceeded")]
    RateLimitedLocal,

    /// Any error surfaced by the catalog client or core pipeline that
    /// isn't a local validation/rate-limit/CSRF concern: catalog auth
    /// failure, catalog rate limiting, transient network failure,
    /// not-found, or an invalid selector. Per the error handling design
    /// these are all reported as 500 at the API boundary, distinguished
    /// only by `error_code`.
    #[error("{message}")]
    Upstream { code: &'static str, message: String },

    /// Unexpected internal failure
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::CsrfInvalid => StatusCode::FORBIDDEN,
            Self::RateLimitedLocal => StatusCode::TOO_MANY_REQUESTS,
            Self::Upstream { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::CsrfInvalid => "CSRF_INVALID",
            Self::RateLimitedLocal => "RATE_LIMITED",
            Self::Upstream { code, .. } => code,
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Log the error with severity tiered by status code. Local rate
    /// limiting is explicitly excluded from error-level logging per the
    /// error handling design ("no log at error level").
    pub fn log(&self) {
        let status = self.status_code();
        if matches!(self, Self::RateLimitedLocal) {
            tracing::debug!(error = %self, code = self.error_code(), "request denied by rate limiter");
        } else if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), status = status.as_u16(), "server error");
        } else {
            tracing::warn!(error = %self, code = self.error_code(), status = status.as_u16(), "client error");
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let error_response = ErrorResponse {
            code: self.error_code(),
            message: self.to_string(),
            details: None,
        };

        if let Self::RateLimitedLocal = &self {
            return (status, [("Retry-After", "60")], Json(error_response)).into_response();
        }

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match &err {
            CatalogError::Unauthenticated => Self::Upstream {
                code: "AUTH_ERROR",
                message: err.to_string(),
            },
            CatalogError::RateLimited => Self::Upstream {
                code: "RATE_LIMITED_UPSTREAM",
                message: err.to_string(),
            },
            CatalogError::Timeout | CatalogError::Http(_) => Self::Upstream {
                code: "TRANSIENT_NETWORK",
                message: err.to_string(),
            },
            CatalogError::ArtistNotFound(_) | CatalogError::PlaylistNotFound(_) => Self::Upstream {
                code: "NOT_FOUND",
                message: err.to_string(),
            },
            CatalogError::InvalidInput(_) => Self::Validation(err.to_string()),
            CatalogError::MissingToken | CatalogError::Api { .. } | CatalogError::Parse(_) => Self::Upstream {
                code: "UPSTREAM_ERROR",
                message: err.to_string(),
            },
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::EmptyQuery => Self::Validation(err.to_string()),
            CoreError::NoMatch(_) => Self::Upstream {
                code: "NOT_FOUND",
                message: err.to_string(),
            },
            CoreError::InvalidSelector(_) | CoreError::NoElements => Self::Upstream {
                code: "INVALID_SELECTOR",
                message: err.to_string(),
            },
            CoreError::FetchFailed { .. } | CoreError::FetchTimeout(_) | CoreError::ContentTooLarge(_) => Self::Upstream {
                code: "TRANSIENT_NETWORK",
                message: err.to_string(),
            },
            CoreError::Catalog(catalog_err) => match catalog_err {
                CatalogError::Unauthenticated => Self::Upstream { code: "AUTH_ERROR", message: catalog_err.to_string() },
                CatalogError::RateLimited => Self::Upstream { code: "RATE_LIMITED_UPSTREAM", message: catalog_err.to_string() },
                CatalogError::Timeout | CatalogError::Http(_) => {
                    Self::Upstream { code: "TRANSIENT_NETWORK", message: catalog_err.to_string() }
                }
                CatalogError::ArtistNotFound(_) | CatalogError::PlaylistNotFound(_) => {
                    Self::Upstream { code: "NOT_FOUND", message: catalog_err.to_string() }
                }
                CatalogError::InvalidInput(_) => Self::Validation(catalog_err.to_string()),
                CatalogError::MissingToken | CatalogError::Api { .. } | CatalogError::Parse(_) => {
                    Self::Upstream { code: "UPSTREAM_ERROR", message: catalog_err.to_string() }
                }
            },
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => Self::Internal(err.to_string()),
        }
    }
}
