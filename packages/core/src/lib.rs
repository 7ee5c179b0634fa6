//! The discovery-and-enqueue pipeline
//!
//! Coordinates the web scraper, fuzzy resolver, duplicate guard, and
//! playlist manager against the [`playlist_scout_catalog_client`]
//! capability contract. This crate has no HTTP surface of its own;
//! `apps/api` and `apps/cli` both depend on it.

pub mod duplicate_guard;
pub mod error;
pub mod html;
pub mod models;
pub mod playlist;
pub mod resolver;
pub mod scraper_engine;

pub use duplicate_guard::DuplicateGuard;
pub use error::{CoreError, CoreResult};
pub use models::{AddOutcome, Bucket, DuplicateVerdict, MatchResult, ScrapeOutcome};
pub use playlist::PlaylistManager;
pub use resolver::{Resolver, ResolvedMatch};
pub use scraper_engine::{ScraperConfig, ScraperEngine};
