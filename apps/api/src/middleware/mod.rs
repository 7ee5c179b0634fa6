//! Middleware stack for the playlist-scout API
//!
//! Applied (outermost to innermost) in the order correlation ID, request
//! logging, security headers, then — within the `/api` sub-router — CSRF
//! protection, input validation, rate limiting, then the handler.
//! `request_log` reads the `CorrelationId` extension, so `correlation_id`
//! must run first.

pub mod correlation_id;
pub mod csrf;
pub mod rate_limit;
pub mod request_log;
pub mod security_headers;
pub mod validation;

pub use correlation_id::{correlation_id, CorrelationId};
pub use csrf::{csrf_protection, CsrfStore};
pub use rate_limit::{rate_limit, RateLimitConfig, RateLimiter};
pub use request_log::request_log;
pub use security_headers::{security_headers, SecurityHeadersConfig};
pub use validation::validate_input;
