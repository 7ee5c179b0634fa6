//! Playlist manager: thin orchestration over the catalog client

use std::sync::Arc;

use playlist_scout_catalog_client::{CatalogClient, Playlist, Track};
use tracing::instrument;

use crate::duplicate_guard::DuplicateGuard;
use crate::error::CoreResult;
use crate::models::{AddOutcome, DuplicateVerdict};
use crate::resolver::Resolver;

const TOP_TRACKS_LIMIT: usize = 5;

/// Orchestrates playlist operations: resolving the "incoming" set,
/// adding artists, and delegating duplicate checks.
pub struct PlaylistManager {
    catalog: Arc<dyn CatalogClient>,
    resolver: Resolver,
    guard: DuplicateGuard,
}

impl PlaylistManager {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        PlaylistManager {
            catalog: catalog.clone(),
            resolver: Resolver::new(catalog.clone()),
            guard: DuplicateGuard::new(catalog),
        }
    }

    /// Resolve the "Incoming" playlist set.
    ///
    /// Catalogs expose no folder API, so this falls back through a
    /// chain of name heuristics: substring match on "incoming", then
    /// names starting with "i", then all user-owned playlists.
    #[instrument(skip(self))]
    pub async fn get_incoming_playlists(&self) -> CoreResult<Vec<Playlist>> {
        let all = self.catalog.get_user_playlists().await?;

        let by_substring: Vec<Playlist> = all
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains("incoming")
                    || p.description.as_deref().unwrap_or("").to_lowercase().contains("incoming")
            })
            .cloned()
            .collect();
        if !by_substring.is_empty() {
            return Ok(by_substring);
        }

        let by_initial: Vec<Playlist> = all
            .iter()
            .filter(|p| p.name.to_lowercase().starts_with('i'))
            .cloned()
            .collect();
        if !by_initial.is_empty() {
            return Ok(by_initial);
        }

        Ok(all)
    }

    /// Case-insensitive substring filter on playlist name. An empty
    /// term returns the input unchanged.
    pub fn filter_by_name(&self, playlists: &[Playlist], term: &str) -> Vec<Playlist> {
        if term.is_empty() {
            return playlists.to_vec();
        }
        let needle = term.to_lowercase();
        playlists
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// The artist's top tracks, capped at 5, preserving catalog order.
    #[instrument(skip(self))]
    pub async fn get_top5(&self, artist_id: &str) -> CoreResult<Vec<Track>> {
        let tracks = self.catalog.get_artist_top_tracks(artist_id).await?;
        Ok(tracks.into_iter().take(TOP_TRACKS_LIMIT).collect())
    }

    /// Add an artist's top tracks to a playlist, suppressing
    /// re-additions unless `force` is set.
    #[instrument(skip(self))]
    pub async fn add_artist_to_playlist(&self, artist_name: &str, playlist_id: &str, force: bool) -> CoreResult<AddOutcome> {
        let (artist, _confidence) = self.resolver.find_best_match(artist_name).await?;
        let top_tracks = self.get_top5(&artist.id).await?;

        if top_tracks.is_empty() {
            return Ok(AddOutcome::Failed {
                message: format!("{} has no tracks available", artist.name),
            });
        }

        if !force {
            let verdict = self.guard.check_duplicates(playlist_id, &top_tracks).await?;
            if verdict.has_duplicates {
                return Ok(AddOutcome::Duplicate {
                    artist,
                    message: verdict.message,
                });
            }
        }

        let track_ids: Vec<String> = top_tracks.iter().map(|t| t.id.clone()).collect();
        self.add_tracks_to_playlist(playlist_id, &track_ids).await?;

        Ok(AddOutcome::Added {
            artist,
            tracks_added: top_tracks,
        })
    }

    /// Append tracks to a playlist, passing through to the catalog.
    #[instrument(skip(self, track_ids))]
    pub async fn add_tracks_to_playlist(&self, playlist_id: &str, track_ids: &[String]) -> CoreResult<()> {
        self.catalog.add_tracks_to_playlist(playlist_id, track_ids).await?;
        Ok(())
    }

    /// Check for duplicate tracks directly, given track ids rather than
    /// an artist name.
    #[instrument(skip(self, track_ids))]
    pub async fn check_for_duplicates(&self, playlist_id: &str, track_ids: &[String]) -> CoreResult<DuplicateVerdict> {
        let present = self.catalog.check_tracks_in_playlist(playlist_id, track_ids).await?;
        let has_duplicates = present.iter().any(|&p| p);
        let duplicate_count = present.iter().filter(|&&p| p).count();

        Ok(DuplicateVerdict {
            has_duplicates,
            duplicate_tracks: Vec::new(),
            checked_at: chrono::Utc::now(),
            artist_name: String::new(),
            message: if has_duplicates {
                format!("{duplicate_count} track(s) already present. Add Anyway to include them again.")
            } else {
                "no duplicate tracks found".to_string()
            },
        })
    }
}
