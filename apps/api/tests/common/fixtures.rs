//! Test fixtures for API integration tests
//!
//! Provides reusable test data and configuration builders.

#![allow(dead_code)]

use std::collections::HashMap;

use playlist_scout_catalog_client::{Artist, Playlist, Track};

/// Test environment variables builder
///
/// Builds a HashMap of environment variables for testing configuration loading.
#[derive(Debug, Default)]
pub struct TestEnvBuilder {
    vars: HashMap<String, String>,
}

impl TestEnvBuilder {
    /// Create a new test environment builder with minimal required variables
    pub fn new() -> Self {
        let mut builder = Self::default();
        builder
            .set("ENVIRONMENT", "development")
            .set("HOST", "127.0.0.1")
            .set("PORT", "0")
            .set("CATALOG_API_BASE_URL", "https://api.spotify.test")
            .set("CATALOG_EMBED_HOST", "open.spotify.test")
            .set("CATALOG_BEARER_TOKEN", "");
        builder
    }

    /// Create a production-like environment
    pub fn production() -> Self {
        let mut builder = Self::default();
        builder
            .set("ENVIRONMENT", "production")
            .set("HOST", "0.0.0.0")
            .set("PORT", "8080")
            .set("CATALOG_API_BASE_URL", "https://api.spotify.com")
            .set("CATALOG_EMBED_HOST", "open.spotify.com")
            .set("CATALOG_BEARER_TOKEN", "prod-bearer-token");
        builder
    }

    /// Set an environment variable
    pub fn set(&mut self, key: &str, value: &str) -> &mut Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Remove an environment variable
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.vars.remove(key);
        self
    }

    /// Get the environment variables as a HashMap
    pub fn build(&self) -> HashMap<String, String> {
        self.vars.clone()
    }

    /// Get the environment variables as tuples for temp_env
    pub fn as_tuples(&self) -> Vec<(String, String)> {
        self.vars.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

/// Test configuration for API config
#[derive(Debug, Clone)]
pub struct TestApiConfig {
    pub port: u16,
    pub rate_limit_rps: f64,
    pub rate_limit_burst: f64,
    pub max_content_size: usize,
}

impl Default for TestApiConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            rate_limit_rps: 1.0,
            rate_limit_burst: 1.0,
            max_content_size: 10 * 1024 * 1024,
        }
    }
}

/// Build a fixture artist
pub fn test_artist(id: &str, name: &str) -> Artist {
    Artist {
        id: id.to_string(),
        name: name.to_string(),
        genres: vec!["rock".to_string()],
    }
}

/// Build a fixture track belonging to `artist`
pub fn test_track(id: &str, artist: &Artist) -> Track {
    Track {
        id: id.to_string(),
        name: format!("Track {id}"),
        artists: vec![artist.clone()],
        duration_ms: 210_000,
    }
}

/// Build 5 fixture tracks for an artist, `{prefix}1`..`{prefix}5`
pub fn test_top_tracks(prefix: &str, artist: &Artist) -> Vec<Track> {
    (1..=5).map(|n| test_track(&format!("{prefix}{n}"), artist)).collect()
}

/// Build a fixture playlist
pub fn test_playlist(id: &str, name: &str) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: name.to_string(),
        uri: format!("spotify:playlist:{id}"),
        track_count: 0,
        owner_id: "test-user".to_string(),
        description: None,
    }
}

/// HTML fixture used by scrape tests: a single `div.c` listing four
/// comma-separated artist names, one below the match-confidence threshold.
pub const SCRAPE_FIXTURE_HTML: &str =
    r#"<html><body><div class="c">Radiohead, The Beatles, zzz, Pink Floyd</div></body></html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_builder_new_has_defaults() {
        let builder = TestEnvBuilder::new();
        let vars = builder.build();

        assert!(vars.contains_key("ENVIRONMENT"));
        assert!(vars.contains_key("CATALOG_API_BASE_URL"));
        assert_eq!(vars.get("ENVIRONMENT").unwrap(), "development");
    }

    #[test]
    fn test_env_builder_production() {
        let builder = TestEnvBuilder::production();
        let vars = builder.build();

        assert_eq!(vars.get("ENVIRONMENT").unwrap(), "production");
        assert!(vars.contains_key("CATALOG_BEARER_TOKEN"));
    }

    #[test]
    fn test_env_builder_set_and_remove() {
        let mut builder = TestEnvBuilder::new();
        builder.set("CUSTOM_VAR", "custom_value");
        assert_eq!(builder.build().get("CUSTOM_VAR").unwrap(), "custom_value");

        builder.remove("CUSTOM_VAR");
        assert!(!builder.build().contains_key("CUSTOM_VAR"));
    }

    #[test]
    fn test_default_api_config() {
        let config = TestApiConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rate_limit_burst, 1.0);
    }

    #[test]
    fn test_top_tracks_has_five_entries() {
        let artist = test_artist("a1", "Radiohead");
        let tracks = test_top_tracks("t", &artist);
        assert_eq!(tracks.len(), 5);
        assert_eq!(tracks[0].id, "t1");
    }
}
