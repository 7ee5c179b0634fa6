//! Catalog domain models
//!
//! These are the projections of catalog state that cross the client
//! boundary. Per spec they are never cached beyond a single request.

use serde::{Deserialize, Serialize};

/// A catalog-identified performer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// A catalog-identified recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<Artist>,
    pub duration_ms: u32,
}

/// A catalog-identified track collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    /// Catalog URI, e.g. `spotify:playlist:37i9dQZF1`
    pub uri: String,
    pub track_count: u32,
    /// Owner's catalog user id, used to filter to user-owned playlists
    pub owner_id: String,
    #[serde(default)]
    pub description: Option<String>,
}
