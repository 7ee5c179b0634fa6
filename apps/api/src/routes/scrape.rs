//! `POST /api/scrape-artists`

use axum::extract::State;
use axum::Json;

use crate::error::ApiResult;
use crate::models::{ScrapeArtistsRequest, ScrapeArtistsResponse};
use crate::state::AppState;

pub async fn scrape_artists(State(state): State<AppState>, Json(body): Json<ScrapeArtistsRequest>) -> ApiResult<Json<ScrapeArtistsResponse>> {
    if body.url.trim().is_empty() {
        return Err(crate::error::ApiError::Validation("url must not be empty".to_string()));
    }
    if body.css_selector.len() > 500 {
        return Err(crate::error::ApiError::Validation("css_selector must be at most 500 characters".to_string()));
    }

    let outcome = state.scraper.scrape_and_add(&body.url, &body.css_selector, &body.playlist_id, body.force).await?;

    Ok(Json(ScrapeArtistsResponse::new(outcome)))
}
