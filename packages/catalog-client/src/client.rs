//! HTTP-backed catalog API client implementation

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Artist, Playlist, Track};

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default number of retry attempts for transient failures
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds)
const RETRY_BASE_DELAY_MS: u64 = 100;

/// The external catalog capability this system depends on.
///
/// The OAuth authorization-code flow that produces the bearer token is out
/// of scope here; implementors are handed a valid token and are
/// responsible only for the five operations below.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Search for an artist by free-form name; returns the single
    /// highest-ranked hit, or `None` if nothing matched.
    async fn search_artist(&self, query: &str) -> CatalogResult<Option<Artist>>;

    /// Return the artist's top tracks, ranked, un-truncated.
    async fn get_artist_top_tracks(&self, artist_id: &str) -> CatalogResult<Vec<Track>>;

    /// Return all playlists owned by the authenticated principal.
    async fn get_user_playlists(&self) -> CatalogResult<Vec<Playlist>>;

    /// Append tracks to a playlist, in argument order.
    async fn add_tracks_to_playlist(&self, playlist_id: &str, track_ids: &[String]) -> CatalogResult<()>;

    /// Check which of `track_ids` are already present in `playlist_id`.
    /// Returns a vector of booleans parallel to `track_ids`.
    async fn check_tracks_in_playlist(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> CatalogResult<Vec<bool>>;
}

/// Configuration for the HTTP-backed catalog client
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_base_url: String,
    pub bearer_token: String,
}

/// HTTP-backed implementation of [`CatalogClient`]
#[derive(Clone)]
pub struct HttpCatalogClient {
    http: Client,
    base_url: String,
    bearer_token: String,
    max_retries: u32,
}

impl fmt::Debug for HttpCatalogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCatalogClient")
            .field("base_url", &self.base_url)
            .field("bearer_token", &"[REDACTED]")
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl HttpCatalogClient {
    /// Build a new client from configuration.
    ///
    /// # Errors
    /// Returns [`CatalogError::MissingToken`] if the bearer token is empty.
    pub fn new(config: CatalogConfig) -> CatalogResult<Self> {
        if config.bearer_token.is_empty() {
            return Err(CatalogError::MissingToken);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent("playlist-scout/1.0")
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    async fn with_retry<T, F, Fut>(&self, operation: F) -> CatalogResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = CatalogResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay_ms = RETRY_BASE_DELAY_MS * 2u64.pow(attempt);
                    warn!(
                        attempt = attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "catalog request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str, query: &[(&str, &str)]) -> CatalogResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .query(query)
            .send()
            .await
            .map_err(|e| if e.is_timeout() { CatalogError::Timeout } else { CatalogError::Http(e) })?;

        self.handle_status(&response)?;
        let text = response.text().await.map_err(CatalogError::Http)?;
        serde_json::from_str(&text).map_err(CatalogError::Parse)
    }

    fn handle_status(&self, response: &reqwest::Response) -> CatalogResult<()> {
        match response.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::UNAUTHORIZED => Err(CatalogError::Unauthenticated),
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("catalog API rate limited");
                Err(CatalogError::RateLimited)
            }
            status => Err(CatalogError::Api {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown error").to_string(),
            }),
        }
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    #[instrument(skip(self))]
    async fn search_artist(&self, query: &str) -> CatalogResult<Option<Artist>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::InvalidInput("query cannot be empty".to_string()));
        }

        debug!(query = %trimmed, "searching for artist");

        let response: SearchArtistsResponse = self
            .with_retry(|| self.get_json("/v1/search", &[("type", "artist"), ("q", trimmed), ("limit", "1")]))
            .await?;

        Ok(response.artists.items.into_iter().next().map(Into::into))
    }

    #[instrument(skip(self))]
    async fn get_artist_top_tracks(&self, artist_id: &str) -> CatalogResult<Vec<Track>> {
        let path = format!("/v1/artists/{}/top-tracks", artist_id);
        let response: TopTracksResponse = self.with_retry(|| self.get_json(&path, &[])).await?;
        Ok(response.tracks.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn get_user_playlists(&self) -> CatalogResult<Vec<Playlist>> {
        let response: UserPlaylistsResponse = self.with_retry(|| self.get_json("/v1/me/playlists", &[("limit", "50")])).await?;
        Ok(response.items.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, track_ids))]
    async fn add_tracks_to_playlist(&self, playlist_id: &str, track_ids: &[String]) -> CatalogResult<()> {
        if track_ids.is_empty() {
            return Ok(());
        }

        let url = format!("{}/v1/playlists/{}/tracks", self.base_url, playlist_id);
        let uris: Vec<String> = track_ids.iter().map(|id| format!("catalog:track:{}", id)).collect();

        self.with_retry(|| async {
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.bearer_token)
                .json(&serde_json::json!({ "uris": uris }))
                .send()
                .await
                .map_err(|e| if e.is_timeout() { CatalogError::Timeout } else { CatalogError::Http(e) })?;
            self.handle_status(&response)
        })
        .await
    }

    #[instrument(skip(self, track_ids))]
    async fn check_tracks_in_playlist(&self, playlist_id: &str, track_ids: &[String]) -> CatalogResult<Vec<bool>> {
        if track_ids.is_empty() {
            return Ok(Vec::new());
        }

        let path = format!("/v1/playlists/{}/tracks/contains", playlist_id);
        let ids_csv = track_ids.join(",");
        let response: ContainsResponse = self
            .with_retry(|| self.get_json(&path, &[("ids", &ids_csv)]))
            .await?;

        if response.contains.len() != track_ids.len() {
            return Err(CatalogError::Api {
                status: 0,
                message: "contains response length mismatch".to_string(),
            });
        }

        Ok(response.contains)
    }
}

// ========== Wire models ==========

#[derive(Debug, Deserialize)]
struct SearchArtistsResponse {
    artists: ArtistItems,
}

#[derive(Debug, Deserialize)]
struct ArtistItems {
    items: Vec<RawArtist>,
}

#[derive(Debug, Deserialize)]
struct RawArtist {
    id: String,
    name: String,
    #[serde(default)]
    genres: Vec<String>,
}

impl From<RawArtist> for Artist {
    fn from(raw: RawArtist) -> Self {
        Artist {
            id: raw.id,
            name: raw.name,
            genres: raw.genres,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TopTracksResponse {
    tracks: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    id: String,
    name: String,
    artists: Vec<RawArtist>,
    duration_ms: u32,
}

impl From<RawTrack> for Track {
    fn from(raw: RawTrack) -> Self {
        Track {
            id: raw.id,
            name: raw.name,
            artists: raw.artists.into_iter().map(Into::into).collect(),
            duration_ms: raw.duration_ms,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserPlaylistsResponse {
    items: Vec<RawPlaylist>,
}

#[derive(Debug, Deserialize)]
struct RawPlaylist {
    id: String,
    name: String,
    uri: String,
    #[serde(default)]
    description: Option<String>,
    tracks: RawPlaylistTracks,
    owner: RawOwner,
}

#[derive(Debug, Deserialize)]
struct RawPlaylistTracks {
    total: u32,
}

#[derive(Debug, Deserialize)]
struct RawOwner {
    id: String,
}

impl From<RawPlaylist> for Playlist {
    fn from(raw: RawPlaylist) -> Self {
        Playlist {
            id: raw.id,
            name: raw.name,
            uri: raw.uri,
            track_count: raw.tracks.total,
            owner_id: raw.owner.id,
            description: raw.description,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContainsResponse {
    contains: Vec<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_bearer_token() {
        let result = HttpCatalogClient::new(CatalogConfig {
            api_base_url: "https://api.example.com".to_string(),
            bearer_token: String::new(),
        });
        assert!(matches!(result, Err(CatalogError::MissingToken)));
    }

    #[test]
    fn test_client_accepts_valid_token() {
        let result = HttpCatalogClient::new(CatalogConfig {
            api_base_url: "https://api.example.com".to_string(),
            bearer_token: "secret".to_string(),
        });
        assert!(result.is_ok());
    }

    #[test]
    fn test_client_debug_redacts_token() {
        let client = HttpCatalogClient::new(CatalogConfig {
            api_base_url: "https://api.example.com".to_string(),
            bearer_token: "super-secret-token".to_string(),
        })
        .unwrap();
        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("super-secret-token"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_raw_artist_conversion() {
        let raw = RawArtist {
            id: "a1".to_string(),
            name: "Radiohead".to_string(),
            genres: vec!["alternative".to_string()],
        };
        let artist: Artist = raw.into();
        assert_eq!(artist.id, "a1");
        assert_eq!(artist.genres, vec!["alternative".to_string()]);
    }

    #[test]
    fn test_error_is_retryable() {
        assert!(CatalogError::Timeout.is_retryable());
        assert!(CatalogError::RateLimited.is_retryable());
        assert!(!CatalogError::MissingToken.is_retryable());
        assert!(!CatalogError::ArtistNotFound("x".to_string()).is_retryable());
    }

    fn client_for(mock_server: &wiremock::MockServer) -> HttpCatalogClient {
        HttpCatalogClient::new(CatalogConfig {
            api_base_url: mock_server.uri(),
            bearer_token: "test-token".to_string(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_artist_parses_response() {
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", "Radiohead"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "artists": { "items": [{ "id": "a1", "name": "Radiohead", "genres": ["alternative"] }] }
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let artist = client.search_artist("Radiohead").await.unwrap().unwrap();
        assert_eq!(artist.id, "a1");
        assert_eq!(artist.name, "Radiohead");
    }

    #[tokio::test]
    async fn test_unauthorized_response_maps_to_unauthenticated() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.search_artist("Radiohead").await.unwrap_err();
        assert!(matches!(err, CatalogError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_rate_limited_response_maps_to_rate_limited_error() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.search_artist("Radiohead").await.unwrap_err();
        assert!(matches!(err, CatalogError::RateLimited));
    }

    #[tokio::test]
    async fn test_transient_server_error_retries_then_succeeds() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;

        // Registered first so it's the fallback once the error mock below
        // exhausts its two allowed matches.
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "artists": { "items": [{ "id": "a1", "name": "Radiohead", "genres": [] }] }
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let artist = client.search_artist("Radiohead").await.unwrap().unwrap();
        assert_eq!(artist.id, "a1");
        assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_retries_exhausted_returns_last_error() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.search_artist("Radiohead").await.unwrap_err();
        assert!(matches!(err, CatalogError::Api { status: 503, .. }));
        // Initial attempt plus DEFAULT_MAX_RETRIES retries.
        assert_eq!(mock_server.received_requests().await.unwrap().len(), (DEFAULT_MAX_RETRIES + 1) as usize);
    }
}
