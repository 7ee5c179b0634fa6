//! Pipeline-internal data model
//!
//! Internally several of these are tagged unions (per design note: a
//! richer sum type is more faithful than the flat wire shape the HTTP API
//! exposes). The flat projection used at the HTTP boundary lives next to
//! each type as a `to_wire()` method, kept in `apps/api` out of this
//! crate's concern where the shape is purely presentational.

use chrono::{DateTime, Utc};
use playlist_scout_catalog_client::{Artist, Track};
use serde::{Deserialize, Serialize};

/// Result of one add-artist attempt.
///
/// The internal representation is a sum type: exactly one variant is ever
/// true at a time, which the flat `{success, is_duplicate}` wire shape
/// cannot express directly.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// Tracks were appended to the playlist.
    Added { artist: Artist, tracks_added: Vec<Track> },
    /// The artist's top tracks were already present; nothing was added.
    Duplicate { artist: Artist, message: String },
    /// The attempt failed for a recoverable reason (resolve/fetch/add).
    Failed { message: String },
}

impl AddOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AddOutcome::Added { .. })
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, AddOutcome::Duplicate { .. })
    }

    pub fn tracks_added(&self) -> &[Track] {
        match self {
            AddOutcome::Added { tracks_added, .. } => tracks_added,
            _ => &[],
        }
    }
}

/// Result of a duplicate check against a playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateVerdict {
    pub has_duplicates: bool,
    pub duplicate_tracks: Vec<Track>,
    pub checked_at: DateTime<Utc>,
    pub artist_name: String,
    pub message: String,
}

/// One fuzzy-resolve-and-enqueue outcome, as recorded for a single
/// candidate name during a scrape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub query: String,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<Artist>,
    pub confidence: f64,
    pub tracks_added: u32,
    pub was_duplicate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MatchResult {
    pub fn unmatched(query: impl Into<String>, confidence: f64, error: impl Into<String>) -> Self {
        MatchResult {
            query: query.into(),
            matched: false,
            artist: None,
            confidence,
            tracks_added: 0,
            was_duplicate: false,
            error: Some(error.into()),
        }
    }
}

/// Result of one scrape-and-enqueue invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeOutcome {
    pub source_url: String,
    pub selector: String,
    pub artists_found: Vec<String>,
    pub match_results: Vec<MatchResult>,
    pub success_count: u32,
    pub failure_count: u32,
    pub duplicate_count: u32,
    pub total_tracks_added: u32,
    pub message: String,
    pub errors: Vec<String>,
}

impl ScrapeOutcome {
    pub fn summary_line(&self) -> String {
        format!(
            "found {} candidates: {} added ({} tracks), {} duplicate, {} failed",
            self.artists_found.len(),
            self.success_count,
            self.total_tracks_added,
            self.duplicate_count,
            self.failure_count
        )
    }
}

/// Per-client token-bucket admission state, keyed by client IP in the
/// rate limiter's map.
#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    pub tokens: f64,
    pub last_refill: DateTime<Utc>,
    pub rate: f64,
    pub burst: f64,
}

impl Bucket {
    pub fn new(rate: f64, burst: f64, now: DateTime<Utc>) -> Self {
        Bucket {
            tokens: burst,
            last_refill: now,
            rate,
            burst,
        }
    }

    /// Whether this bucket is idle enough to be a sweep candidate: per
    /// the source's approximation, a bucket at full capacity "looks
    /// unused" (see design notes on the open question about this).
    pub fn is_sweep_candidate(&self) -> bool {
        self.tokens >= self.burst
    }
}
