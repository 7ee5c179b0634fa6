//! `POST /api/add-artist`

use axum::extract::State;
use axum::Json;

use crate::error::ApiResult;
use crate::models::{AddArtistRequest, AddArtistResponse};
use crate::state::AppState;

pub async fn add_artist(State(state): State<AppState>, Json(body): Json<AddArtistRequest>) -> ApiResult<Json<AddArtistResponse>> {
    let name = body.artist_name.trim();
    if name.is_empty() || name.len() > 100 {
        return Err(crate::error::ApiError::Validation("artist_name must be 1-100 characters".to_string()));
    }

    let outcome = state.playlists.add_artist_to_playlist(name, &body.playlist_id, body.force).await?;

    Ok(Json(AddArtistResponse::from_outcome(outcome)))
}
