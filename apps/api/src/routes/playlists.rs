//! `GET /api/playlists?search=<optional>`

use std::collections::HashSet;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::models::{PlaylistView, PlaylistsResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlaylistsQuery {
    search: Option<String>,
}

pub async fn list_playlists(State(state): State<AppState>, Query(query): Query<PlaylistsQuery>) -> ApiResult<Json<PlaylistsResponse>> {
    let all = state.catalog.get_user_playlists().await?;
    let incoming = state.playlists.get_incoming_playlists().await?;
    let incoming_ids: HashSet<&str> = incoming.iter().map(|p| p.id.as_str()).collect();

    let filtered = match &query.search {
        Some(term) if !term.is_empty() => state.playlists.filter_by_name(&all, term),
        _ => all,
    };

    let data = filtered.iter().map(|p| PlaylistView::new(p, incoming_ids.contains(p.id.as_str()))).collect();

    Ok(Json(PlaylistsResponse { success: true, data }))
}
