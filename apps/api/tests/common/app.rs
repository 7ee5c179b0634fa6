//! Shared helper for assembling a full `AppState` + router over a
//! `StubCatalogClient`, used by the scenario integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ConnectInfo;
use axum::Router;

use playlist_scout_api::middleware::{CsrfStore, RateLimitConfig, RateLimiter, SecurityHeadersConfig};
use playlist_scout_api::routes::api_router;
use playlist_scout_api::state::AppState;
use playlist_scout_core::{PlaylistManager, ScraperConfig, ScraperEngine};
use playlist_scout_test_utils::StubCatalogClient;

/// Build the `/api` router wired to a `StubCatalogClient`, with a rate
/// limiter loose enough by default that tests opt into tight limits
/// explicitly via `rate_limit`.
pub struct TestAppBuilder {
    pub catalog: StubCatalogClient,
    rate_limit_rps: f64,
    rate_limit_burst: f64,
}

impl TestAppBuilder {
    pub fn new(catalog: StubCatalogClient) -> Self {
        TestAppBuilder { catalog, rate_limit_rps: 1000.0, rate_limit_burst: 1000.0 }
    }

    pub fn rate_limit(mut self, rps: f64, burst: f64) -> Self {
        self.rate_limit_rps = rps;
        self.rate_limit_burst = burst;
        self
    }

    pub fn build(self) -> (Router, Arc<CsrfStore>) {
        let catalog: Arc<dyn playlist_scout_catalog_client::CatalogClient> = Arc::new(self.catalog);
        let playlists = Arc::new(PlaylistManager::new(catalog.clone()));
        let scraper = Arc::new(
            ScraperEngine::new(catalog.clone(), ScraperConfig::default()).expect("scraper engine should build"),
        );
        let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig::new(self.rate_limit_rps, self.rate_limit_burst)));
        let csrf_store = Arc::new(CsrfStore::new(Duration::from_secs(86_400)));

        let state = AppState {
            catalog,
            playlists,
            scraper,
            rate_limiter,
            csrf_store: csrf_store.clone(),
            security_headers: SecurityHeadersConfig {
                catalog_api_host: "api.spotify.test".to_string(),
                catalog_embed_host: "open.spotify.test".to_string(),
                is_production: false,
            },
            authenticated: true,
        };

        (api_router(state), csrf_store)
    }
}

/// A loopback `ConnectInfo` extension for requests built by hand; the
/// rate limiter's IP extractor falls back to this when no
/// `X-Forwarded-For`/`X-Real-IP` header is present.
pub fn loopback_connect_info() -> ConnectInfo<SocketAddr> {
    ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 0)))
}
