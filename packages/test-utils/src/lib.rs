//! Shared test utilities for the playlist-scout workspace
//!
//! This crate provides an in-memory stand-in for the catalog client so
//! `apps/api` and `packages/core` tests run without a network
//! dependency.
//!
//! # Example
//!
//! ```rust,ignore
//! use playlist_scout_test_utils::StubCatalogClient;
//!
//! let stub = StubCatalogClient::new().with_artist("radiohead", artist);
//! ```

mod stub_catalog;

pub use stub_catalog::StubCatalogClient;
