//! playlist-scout API library
//!
//! Exposes the server's building blocks for the binary entry point and
//! for integration tests.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use state::AppState;
