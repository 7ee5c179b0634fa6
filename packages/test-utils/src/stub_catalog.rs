//! In-memory stand-in for [`CatalogClient`], used across `apps/api` and
//! `packages/core` tests so neither needs a live catalog API.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use playlist_scout_catalog_client::{Artist, CatalogClient, CatalogError, CatalogResult, Playlist, Track};

/// Shared, mutable fixture state behind [`StubCatalogClient`].
///
/// Uses `unwrap_or_else(|e| e.into_inner())` to recover from a poisoned
/// lock so one panicking test doesn't cascade into unrelated failures.
#[derive(Default)]
struct StubState {
    artists_by_query: HashMap<String, Artist>,
    top_tracks: HashMap<String, Vec<Track>>,
    playlists: Vec<Playlist>,
    playlist_tracks: HashMap<String, HashSet<String>>,
    add_tracks_calls: u32,
    search_error: Option<String>,
}

/// In-memory [`CatalogClient`] for tests.
///
/// Cloning shares the underlying fixture state: set up candidates on one
/// handle, hand clones to the code under test, and assert on call counts
/// from the original.
#[derive(Clone)]
pub struct StubCatalogClient {
    state: Arc<RwLock<StubState>>,
}

impl Default for StubCatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StubCatalogClient {
    pub fn new() -> Self {
        StubCatalogClient {
            state: Arc::new(RwLock::new(StubState::default())),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, StubState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, StubState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Register an artist as the result of searching for `query`
    /// (case-insensitive).
    pub fn with_artist(self, query: &str, artist: Artist) -> Self {
        self.write().artists_by_query.insert(query.to_lowercase(), artist);
        self
    }

    /// Set the top tracks returned for `artist_id`.
    pub fn with_top_tracks(self, artist_id: &str, tracks: Vec<Track>) -> Self {
        self.write().top_tracks.insert(artist_id.to_string(), tracks);
        self
    }

    /// Seed the list returned by `get_user_playlists`.
    pub fn with_playlists(self, playlists: Vec<Playlist>) -> Self {
        self.write().playlists = playlists;
        self
    }

    /// Mark the given track ids as already present in `playlist_id`.
    pub fn with_playlist_tracks(self, playlist_id: &str, track_ids: impl IntoIterator<Item = String>) -> Self {
        self.write()
            .playlist_tracks
            .entry(playlist_id.to_string())
            .or_default()
            .extend(track_ids);
        self
    }

    /// Force every `search_artist` call to fail with this message.
    pub fn with_search_error(self, message: &str) -> Self {
        self.write().search_error = Some(message.to_string());
        self
    }

    /// Number of times `add_tracks_to_playlist` has been called so far.
    pub fn add_tracks_call_count(&self) -> u32 {
        self.read().add_tracks_calls
    }
}

#[async_trait]
impl CatalogClient for StubCatalogClient {
    async fn search_artist(&self, query: &str) -> CatalogResult<Option<Artist>> {
        let state = self.read();
        if let Some(message) = &state.search_error {
            return Err(CatalogError::Api { status: 503, message: message.clone() });
        }
        Ok(state.artists_by_query.get(&query.to_lowercase()).cloned())
    }

    async fn get_artist_top_tracks(&self, artist_id: &str) -> CatalogResult<Vec<Track>> {
        Ok(self.read().top_tracks.get(artist_id).cloned().unwrap_or_default())
    }

    async fn get_user_playlists(&self) -> CatalogResult<Vec<Playlist>> {
        Ok(self.read().playlists.clone())
    }

    async fn add_tracks_to_playlist(&self, playlist_id: &str, track_ids: &[String]) -> CatalogResult<()> {
        let mut state = self.write();
        state.add_tracks_calls += 1;
        state
            .playlist_tracks
            .entry(playlist_id.to_string())
            .or_default()
            .extend(track_ids.iter().cloned());
        Ok(())
    }

    async fn check_tracks_in_playlist(&self, playlist_id: &str, track_ids: &[String]) -> CatalogResult<Vec<bool>> {
        let state = self.read();
        let present = state.playlist_tracks.get(playlist_id);
        Ok(track_ids
            .iter()
            .map(|id| present.map(|set| set.contains(id)).unwrap_or(false))
            .collect())
    }
}
