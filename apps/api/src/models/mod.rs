//! Wire-shape request/response DTOs for the HTTP API (§6)
//!
//! Internal domain types live in `playlist-scout-core` and
//! `playlist-scout-catalog-client`; these structs are the flat JSON
//! shapes that actually cross the HTTP boundary, with `From`/builder
//! conversions from the internal sum types where the two diverge (the
//! tagged-union `AddOutcome` in particular).

use serde::{Deserialize, Serialize};

use playlist_scout_catalog_client::{Artist, Playlist, Track};
use playlist_scout_core::{AddOutcome, ScrapeOutcome};

#[derive(Debug, Serialize)]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

/// Wire projection of a [`Playlist`], derived `embed_url`/`is_incoming`
/// fields attached at the route layer.
#[derive(Debug, Serialize)]
pub struct PlaylistView {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub track_count: u32,
    pub embed_url: String,
    pub is_incoming: bool,
}

impl PlaylistView {
    pub fn new(playlist: &Playlist, is_incoming: bool) -> Self {
        PlaylistView {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
            uri: playlist.uri.clone(),
            track_count: playlist.track_count,
            embed_url: embed_url_from_uri(&playlist.uri),
            is_incoming,
        }
    }
}

/// `spotify:playlist:ID` → `https://open.spotify.com/embed/playlist/ID?utm_source=generator&theme=0`
fn embed_url_from_uri(uri: &str) -> String {
    let id = uri.rsplit(':').next().unwrap_or(uri);
    format!("https://open.spotify.com/embed/playlist/{id}?utm_source=generator&theme=0")
}

#[derive(Debug, Serialize)]
pub struct PlaylistsResponse {
    pub success: bool,
    pub data: Vec<PlaylistView>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddArtistRequest {
    pub artist_name: String,
    pub playlist_id: String,
    #[serde(default)]
    pub force: bool,
}

/// Flat wire projection of the internal `AddOutcome` sum type.
#[derive(Debug, Serialize)]
pub struct WireAddOutcome {
    pub success: bool,
    pub was_duplicate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<Artist>,
    pub tracks_added: Vec<Track>,
    pub message: String,
}

impl From<&AddOutcome> for WireAddOutcome {
    fn from(outcome: &AddOutcome) -> Self {
        match outcome {
            AddOutcome::Added { artist, tracks_added } => WireAddOutcome {
                success: true,
                was_duplicate: false,
                artist: Some(artist.clone()),
                tracks_added: tracks_added.clone(),
                message: format!("Added {} tracks for {}", tracks_added.len(), artist.name),
            },
            AddOutcome::Duplicate { artist, message } => WireAddOutcome {
                success: false,
                was_duplicate: true,
                artist: Some(artist.clone()),
                tracks_added: Vec::new(),
                message: message.clone(),
            },
            AddOutcome::Failed { message } => WireAddOutcome {
                success: false,
                was_duplicate: false,
                artist: None,
                tracks_added: Vec::new(),
                message: message.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddArtistResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_duplicate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_added: Option<Vec<String>>,
    pub data: WireAddOutcome,
}

impl AddArtistResponse {
    pub fn from_outcome(outcome: AddOutcome) -> Self {
        let wire = WireAddOutcome::from(&outcome);
        AddArtistResponse {
            success: wire.success,
            message: wire.message.clone(),
            is_duplicate: wire.was_duplicate.then_some(true),
            last_added: (!wire.tracks_added.is_empty()).then(|| wire.tracks_added.iter().map(|t| t.id.clone()).collect()),
            data: wire,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScrapeArtistsRequest {
    pub url: String,
    #[serde(default)]
    pub css_selector: String,
    pub playlist_id: String,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct ScrapeArtistsResponse {
    pub success: bool,
    pub data: ScrapeOutcome,
}

impl ScrapeArtistsResponse {
    pub fn new(outcome: ScrapeOutcome) -> Self {
        ScrapeArtistsResponse {
            success: outcome.failure_count == 0 || outcome.success_count > 0,
            data: outcome,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
}
