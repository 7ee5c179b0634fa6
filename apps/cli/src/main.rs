//! Command-line entry point for the discovery-and-enqueue pipeline
//!
//! Mirrors the `scrape_and_add` behavior exposed by the HTTP API's
//! `POST /api/scrape-artists`, for use without running the server.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playlist_scout_catalog_client::{CatalogConfig, HttpCatalogClient};
use playlist_scout_core::{ScraperConfig, ScraperEngine};

#[derive(Parser)]
#[command(name = "playlist-scout", version, about = "Discover artists and enqueue their top tracks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a web page for artist names and add matches to a playlist
    Scrape {
        /// Page to fetch
        #[arg(long)]
        url: String,
        /// CSS selector to extract text from (empty means the document body)
        #[arg(long, default_value = "")]
        selector: String,
        /// Target playlist id
        #[arg(long)]
        playlist: String,
        /// Add tracks even if the artist's top tracks are already present
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn build_scraper() -> Result<ScraperEngine> {
    let catalog = HttpCatalogClient::new(CatalogConfig {
        api_base_url: env::var("CATALOG_API_BASE_URL").unwrap_or_else(|_| "https://api.spotify.com".to_string()),
        bearer_token: env::var("CATALOG_BEARER_TOKEN").context("CATALOG_BEARER_TOKEN must be set")?,
    })?;

    let config = ScraperConfig {
        max_retries: parse_env_or("SCRAPER_MAX_RETRIES", 3)?,
        retry_backoff: Duration::from_millis(parse_env_or("SCRAPER_RETRY_BACKOFF_MS", 2000)?),
        timeout: Duration::from_secs(parse_env_or("SCRAPER_TIMEOUT_SECS", 30)?),
        max_content_size: parse_env_or("SCRAPER_MAX_CONTENT_BYTES", 10 * 1024 * 1024)?,
        user_agent: env::var("SCRAPER_USER_AGENT").unwrap_or_else(|_| "playlist-scout-bot/1.0".to_string()),
    };

    Ok(ScraperEngine::new(Arc::new(catalog), config)?)
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value.parse().map_err(|e| anyhow::anyhow!("invalid {key} value: {e}")),
        Err(_) => Ok(default),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "playlist_scout_cli=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape { url, selector, playlist, force } => run_scrape(&url, &selector, &playlist, force).await,
    }
}

async fn run_scrape(url: &str, selector: &str, playlist: &str, force: bool) -> Result<()> {
    let scraper = build_scraper()?;

    let outcome = tokio::select! {
        result = scraper.scrape_and_add(url, selector, playlist, force) => result,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("interrupted, aborting");
            std::process::exit(130);
        }
    }?;

    println!("Source: {}", outcome.source_url);
    println!("Selector: {}", if outcome.selector.is_empty() { "(body)" } else { &outcome.selector });
    println!();

    for result in &outcome.match_results {
        if let Some(artist) = &result.artist {
            if result.was_duplicate {
                println!("  {:<30} duplicate (confidence {:.2})", result.query, result.confidence);
            } else if result.matched && result.tracks_added > 0 {
                println!("  {:<30} added {} tracks (confidence {:.2}) -> {}", result.query, result.tracks_added, result.confidence, artist.name);
            } else if let Some(error) = &result.error {
                println!("  {:<30} failed: {error}", result.query);
            }
        } else {
            let reason = result.error.as_deref().unwrap_or("no match");
            println!("  {:<30} unmatched: {reason}", result.query);
        }
    }

    println!();
    println!("{}", outcome.summary_line());

    if outcome.failure_count > 0 && outcome.success_count == 0 {
        std::process::exit(1);
    }

    Ok(())
}
