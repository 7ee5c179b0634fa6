//! Scraper engine: fetch → parse → extract → resolve → guard → enqueue

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use playlist_scout_catalog_client::CatalogClient;
use reqwest::Client;
use tracing::{info, instrument, warn};

use crate::duplicate_guard::{check_duplicates_best_effort, DuplicateGuard};
use crate::error::{CoreError, CoreResult};
use crate::html::{extract_artist_names, extract_text, parse, validate_selector};
use crate::models::{MatchResult, ScrapeOutcome};
use crate::resolver::Resolver;

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BACKOFF_SECS: u64 = 2;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONTENT_SIZE: usize = 10 * 1024 * 1024;
const DEFAULT_USER_AGENT: &str = "playlist-scout-bot/1.0";

/// Confidence below which a resolved candidate does not advance past
/// step 3 of the scrape protocol.
const CONFIDENCE_THRESHOLD: f64 = 0.5;

const TOP_TRACKS_LIMIT: usize = 5;

/// Tunables for [`ScraperEngine::scrape_and_add`], all independently
/// overridable from configuration.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub timeout: Duration,
    pub max_content_size: usize,
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: Duration::from_secs(DEFAULT_RETRY_BACKOFF_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_content_size: DEFAULT_MAX_CONTENT_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Coordinates the full discovery-and-enqueue pipeline for one scrape
/// request.
pub struct ScraperEngine {
    http: Client,
    catalog: Arc<dyn CatalogClient>,
    resolver: Resolver,
    guard: DuplicateGuard,
    config: ScraperConfig,
}

impl ScraperEngine {
    pub fn new(catalog: Arc<dyn CatalogClient>, config: ScraperConfig) -> CoreResult<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| CoreError::FetchFailed {
                url: String::new(),
                message: e.to_string(),
            })?;

        Ok(ScraperEngine {
            http,
            resolver: Resolver::new(catalog.clone()),
            guard: DuplicateGuard::new(catalog.clone()),
            catalog,
            config,
        })
    }

    /// Fetch, parse, and extract candidate artist names only (no
    /// resolution or enqueueing).
    #[instrument(skip(self))]
    pub async fn scrape_artists(&self, url: &str, selector: &str) -> CoreResult<Vec<String>> {
        validate_selector(selector)?;
        let body = self.fetch_with_retry(url).await?;
        let doc = parse(&body);
        let text = extract_text(&doc, selector)?;
        Ok(extract_artist_names(&text))
    }

    /// The full scrape-and-add protocol (spec §4.5).
    #[instrument(skip(self))]
    pub async fn scrape_and_add(&self, url: &str, selector: &str, playlist_id: &str, force: bool) -> CoreResult<ScrapeOutcome> {
        validate_selector(selector)?;
        let body = self.fetch_with_retry(url).await?;
        let doc = parse(&body);
        let text = extract_text(&doc, selector)?;
        let artists_found = extract_artist_names(&text);

        let mut match_results = Vec::with_capacity(artists_found.len());
        let mut success_count = 0u32;
        let mut failure_count = 0u32;
        let mut duplicate_count = 0u32;
        let mut total_tracks_added = 0u32;
        let mut errors = Vec::new();

        for name in &artists_found {
            let resolved = self.resolver.find_best_match(name).await;

            let (artist, confidence) = match resolved {
                Ok((artist, confidence)) if confidence >= CONFIDENCE_THRESHOLD => (artist, confidence),
                Ok((_, confidence)) => {
                    failure_count += 1;
                    match_results.push(MatchResult::unmatched(
                        name,
                        confidence,
                        format!("confidence {confidence:.2} below threshold {CONFIDENCE_THRESHOLD}"),
                    ));
                    continue;
                }
                Err(e) => {
                    failure_count += 1;
                    match_results.push(MatchResult::unmatched(name, 0.1, e.to_string()));
                    continue;
                }
            };

            let mut result = MatchResult {
                query: name.clone(),
                matched: true,
                artist: Some(artist.clone()),
                confidence,
                tracks_added: 0,
                was_duplicate: false,
                error: None,
            };

            if !force {
                let top_tracks = match self.catalog.get_artist_top_tracks(&artist.id).await {
                    Ok(tracks) => tracks.into_iter().take(TOP_TRACKS_LIMIT).collect::<Vec<_>>(),
                    Err(e) => {
                        result.error = Some(e.to_string());
                        failure_count += 1;
                        errors.push(format!("{}: {}", artist.name, e));
                        match_results.push(result);
                        continue;
                    }
                };

                let verdict = check_duplicates_best_effort(&self.guard, playlist_id, &top_tracks).await;
                if verdict.has_duplicates {
                    result.was_duplicate = true;
                    duplicate_count += 1;
                    match_results.push(result);
                    continue;
                }

                match self.add_tracks(playlist_id, &top_tracks).await {
                    Ok(()) => {
                        result.tracks_added = top_tracks.len() as u32;
                        success_count += 1;
                        total_tracks_added += result.tracks_added;
                    }
                    Err(e) => {
                        result.error = Some(e.to_string());
                        failure_count += 1;
                        errors.push(format!("{}: {}", artist.name, e));
                    }
                }
                match_results.push(result);
                continue;
            }

            let top_tracks = match self.catalog.get_artist_top_tracks(&artist.id).await {
                Ok(tracks) => tracks.into_iter().take(TOP_TRACKS_LIMIT).collect::<Vec<_>>(),
                Err(e) => {
                    result.error = Some(e.to_string());
                    failure_count += 1;
                    errors.push(format!("{}: {}", artist.name, e));
                    match_results.push(result);
                    continue;
                }
            };

            match self.add_tracks(playlist_id, &top_tracks).await {
                Ok(()) => {
                    result.tracks_added = top_tracks.len() as u32;
                    success_count += 1;
                    total_tracks_added += result.tracks_added;
                }
                Err(e) => {
                    result.error = Some(e.to_string());
                    failure_count += 1;
                    errors.push(format!("{}: {}", artist.name, e));
                }
            }
            match_results.push(result);
        }

        let outcome = ScrapeOutcome {
            source_url: url.to_string(),
            selector: selector.to_string(),
            artists_found,
            match_results,
            success_count,
            failure_count,
            duplicate_count,
            total_tracks_added,
            message: String::new(),
            errors,
        };

        let mut outcome = outcome;
        outcome.message = outcome.summary_line();

        info!(
            url,
            success_count, failure_count, duplicate_count, total_tracks_added, "scrape complete"
        );

        Ok(outcome)
    }

    async fn add_tracks(&self, playlist_id: &str, tracks: &[playlist_scout_catalog_client::Track]) -> CoreResult<()> {
        let ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
        self.catalog.add_tracks_to_playlist(playlist_id, &ids).await?;
        Ok(())
    }

    /// Fetch `url` with retry-with-backoff and a bounded body size.
    ///
    /// `self.config.timeout` bounds the total wall-clock time of this
    /// call, retries and backoff sleeps included, not each individual
    /// attempt.
    #[instrument(skip(self))]
    async fn fetch_with_retry(&self, url: &str) -> CoreResult<String> {
        match tokio::time::timeout(self.config.timeout, self.fetch_with_retry_unbounded(url)).await {
            Ok(result) => result,
            Err(_) => Err(CoreError::FetchTimeout(url.to_string())),
        }
    }

    async fn fetch_with_retry_unbounded(&self, url: &str) -> CoreResult<String> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.retry_backoff * 2u32.pow(attempt - 1);
                    warn!(url, attempt, ?delay, error = %e, "scrape fetch failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> CoreResult<String> {
        let response = self.http.get(url).send().await.map_err(|e| CoreError::FetchFailed {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(CoreError::FetchFailed {
                url: url.to_string(),
                message: format!("status {}", response.status()),
            });
        }

        let mut stream = response.bytes_stream();
        let mut body = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| CoreError::FetchFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;
            body.extend_from_slice(&chunk);
            if body.len() > self.config.max_content_size {
                return Err(CoreError::ContentTooLarge(self.config.max_content_size));
            }
        }

        String::from_utf8(body).map_err(|e| CoreError::FetchFailed {
            url: url.to_string(),
            message: format!("response was not valid UTF-8: {e}"),
        })
    }
}
