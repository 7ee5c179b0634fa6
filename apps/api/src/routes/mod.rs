//! HTTP route handlers for the playlist-scout API

pub mod add_artist;
pub mod auth_status;
pub mod csrf;
pub mod health;
pub mod playlists;
pub mod scrape;

pub use health::{health_router, HealthState};

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};

use crate::middleware::{csrf_protection, rate_limit, validate_input};
use crate::state::AppState;

/// The `/api` router: CSRF issuance, playlists, add-artist, scrape,
/// auth status. Rate limiting, input validation, and CSRF enforcement
/// are applied here rather than globally, since `/health` is exempt.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/csrf-token", get(csrf::csrf_token))
        .route("/playlists", get(playlists::list_playlists))
        .route("/add-artist", post(add_artist::add_artist))
        .route("/scrape-artists", post(scrape::scrape_artists))
        .route("/auth-status", get(auth_status::auth_status))
        .layer(from_fn_with_state(state.clone(), csrf_protection))
        .layer(from_fn(validate_input))
        .layer(from_fn_with_state(state.clone(), rate_limit))
        .with_state(state)
}
