//! Duplicate guard: per-artist idempotence against a playlist

use std::sync::Arc;

use chrono::Utc;
use playlist_scout_catalog_client::{CatalogClient, Track};
use tracing::{instrument, warn};

use crate::error::CoreResult;
use crate::models::DuplicateVerdict;

const TOP_TRACKS_LIMIT: usize = 5;

/// Answers "is this artist already represented in this playlist?"
pub struct DuplicateGuard {
    catalog: Arc<dyn CatalogClient>,
}

impl DuplicateGuard {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        DuplicateGuard { catalog }
    }

    /// Check whether `artist_id`'s top tracks are already present in
    /// `playlist_id`.
    #[instrument(skip(self))]
    pub async fn check_artist(&self, playlist_id: &str, artist_id: &str) -> CoreResult<DuplicateVerdict> {
        let top_tracks = self.catalog.get_artist_top_tracks(artist_id).await?;
        let top_tracks: Vec<Track> = top_tracks.into_iter().take(TOP_TRACKS_LIMIT).collect();

        if top_tracks.is_empty() {
            return Ok(DuplicateVerdict {
                has_duplicates: false,
                duplicate_tracks: Vec::new(),
                checked_at: Utc::now(),
                artist_name: String::new(),
                message: "artist has no tracks".to_string(),
            });
        }

        let (duplicate_tracks, artist_name) = self.find_duplicates(playlist_id, &top_tracks).await?;
        let has_duplicates = !duplicate_tracks.is_empty();

        let message = if has_duplicates {
            format!(
                "{} already has {} track(s) by {} in this playlist. Add Anyway to include them again.",
                duplicate_tracks.len(),
                if duplicate_tracks.len() == 1 { "is" } else { "are" },
                if artist_name.is_empty() { "this artist" } else { &artist_name }
            )
        } else {
            "no duplicate tracks found".to_string()
        };

        Ok(DuplicateVerdict {
            has_duplicates,
            duplicate_tracks,
            checked_at: Utc::now(),
            artist_name,
            message,
        })
    }

    /// Check whether any of `tracks` are already present in
    /// `playlist_id`. Used directly by the scraper path, which already
    /// has the candidate's tracks in hand.
    #[instrument(skip(self, tracks))]
    pub async fn check_duplicates(&self, playlist_id: &str, tracks: &[Track]) -> CoreResult<DuplicateVerdict> {
        let (duplicate_tracks, artist_name) = self.find_duplicates(playlist_id, tracks).await?;
        let has_duplicates = !duplicate_tracks.is_empty();

        let message = if has_duplicates {
            let names: Vec<&str> = duplicate_tracks.iter().map(|t| t.name.as_str()).collect();
            format!("already in this playlist: {}", names.join(", "))
        } else {
            "no duplicate tracks found".to_string()
        };

        Ok(DuplicateVerdict {
            has_duplicates,
            duplicate_tracks,
            checked_at: Utc::now(),
            artist_name,
            message,
        })
    }

    /// Look up which of `tracks` are already present in `playlist_id`.
    /// Returns the matching tracks and the artist name taken from the
    /// first track, for callers that build their own verdict message.
    async fn find_duplicates(&self, playlist_id: &str, tracks: &[Track]) -> CoreResult<(Vec<Track>, String)> {
        let track_ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
        let present = self.catalog.check_tracks_in_playlist(playlist_id, &track_ids).await?;

        let duplicate_tracks: Vec<Track> = tracks
            .iter()
            .zip(present.iter())
            .filter_map(|(track, &is_present)| if is_present { Some(track.clone()) } else { None })
            .collect();

        let artist_name = tracks
            .first()
            .and_then(|t| t.artists.first())
            .map(|a| a.name.clone())
            .unwrap_or_default();

        Ok((duplicate_tracks, artist_name))
    }
}

/// Best-effort duplicate check used by the scraper path: catalog errors
/// are logged and treated as "no duplicate" so a transient failure does
/// not block the add.
pub async fn check_duplicates_best_effort(
    guard: &DuplicateGuard,
    playlist_id: &str,
    tracks: &[Track],
) -> DuplicateVerdict {
    match guard.check_duplicates(playlist_id, tracks).await {
        Ok(verdict) => verdict,
        Err(e) => {
            warn!(error = %e, playlist_id, "duplicate guard failed, proceeding as if no duplicate");
            DuplicateVerdict {
                has_duplicates: false,
                duplicate_tracks: Vec::new(),
                checked_at: Utc::now(),
                artist_name: String::new(),
                message: "duplicate check unavailable".to_string(),
            }
        }
    }
}
