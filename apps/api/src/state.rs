//! Shared application state
//!
//! A single `AppState` is cloned into every route and threaded into
//! middleware via axum's `FromRef` pattern, so each layer only
//! extracts the slice of state it actually needs.

use std::sync::Arc;

use axum::extract::FromRef;

use playlist_scout_catalog_client::CatalogClient;
use playlist_scout_core::{PlaylistManager, ScraperEngine};

use crate::middleware::{CsrfStore, RateLimiter, SecurityHeadersConfig};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogClient>,
    pub playlists: Arc<PlaylistManager>,
    pub scraper: Arc<ScraperEngine>,
    pub rate_limiter: Arc<RateLimiter>,
    pub csrf_store: Arc<CsrfStore>,
    pub security_headers: SecurityHeadersConfig,
    /// Whether a catalog bearer token was configured. The OAuth flow
    /// that produces one is out of scope; this only reflects whether
    /// the process has credentials to call the catalog at all.
    pub authenticated: bool,
}

impl FromRef<AppState> for Arc<dyn CatalogClient> {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}

impl FromRef<AppState> for Arc<PlaylistManager> {
    fn from_ref(state: &AppState) -> Self {
        state.playlists.clone()
    }
}

impl FromRef<AppState> for Arc<ScraperEngine> {
    fn from_ref(state: &AppState) -> Self {
        state.scraper.clone()
    }
}

impl FromRef<AppState> for Arc<RateLimiter> {
    fn from_ref(state: &AppState) -> Self {
        state.rate_limiter.clone()
    }
}

impl FromRef<AppState> for Arc<CsrfStore> {
    fn from_ref(state: &AppState) -> Self {
        state.csrf_store.clone()
    }
}

impl FromRef<AppState> for SecurityHeadersConfig {
    fn from_ref(state: &AppState) -> Self {
        state.security_headers.clone()
    }
}
