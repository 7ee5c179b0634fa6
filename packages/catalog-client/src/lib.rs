//! Catalog API client
//!
//! Wraps the external music-catalog HTTP API behind the [`CatalogClient`]
//! capability contract so that the rest of the system can depend on the
//! trait rather than on `reqwest` directly. Production code uses
//! [`HttpCatalogClient`]; tests substitute an in-memory stub.

pub mod client;
pub mod error;
pub mod models;

pub use client::{CatalogClient, CatalogConfig, HttpCatalogClient};
pub use error::{CatalogError, CatalogResult};
pub use models::{Artist, Playlist, Track};
