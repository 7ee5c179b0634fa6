//! API server configuration
//!
//! Loaded from environment variables with `dotenvy` pre-loading a local
//! `.env` file in development.

use std::env;
use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};

/// Deployment environment, used to gate behavior like HSTS and CORS
/// strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,

    /// Server bind host (default: 0.0.0.0)
    pub host: String,
    /// Server bind port (default: 8080)
    pub port: u16,
    /// Graceful shutdown grace period (default: 30s)
    pub shutdown_grace: Duration,

    /// Per-IP requests/sec for the rate limiter
    pub rate_limit_rps: f64,
    /// Per-IP bucket capacity for the rate limiter
    pub rate_limit_burst: f64,

    /// Scraper fetch deadline
    pub scraper_timeout: Duration,
    /// Scraper retry budget on transport/status failure
    pub scraper_max_retries: u32,
    /// Scraper initial backoff, doubled per attempt
    pub scraper_retry_backoff: Duration,
    /// User-Agent sent by the scraper's HTTP client
    pub scraper_user_agent: String,
    /// Maximum bytes read from a scraped response
    pub scraper_max_content_bytes: usize,

    /// Base URL of the catalog's REST API
    pub catalog_api_base_url: String,
    /// Host permitted in the CSP for embedded catalog widgets
    pub catalog_embed_host: String,
    /// Bearer token for the catalog API. The OAuth flow that produces
    /// this is out of scope; it is read as a pre-obtained secret.
    pub catalog_bearer_token: String,

    /// CSRF token lifetime (default: 24h)
    pub csrf_token_ttl: Duration,
    /// CSRF token store sweep interval (default: 1h)
    pub csrf_sweep_interval: Duration,

    /// CORS allowed origins, if restricted
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str(&env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()));

        Ok(Self {
            environment,

            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("invalid PORT value")?,
            shutdown_grace: Duration::from_secs(parse_env_or("SHUTDOWN_GRACE_SECS", 30)?),

            rate_limit_rps: parse_env_or("RATE_LIMIT_RPS", 10.0)?,
            rate_limit_burst: parse_env_or("RATE_LIMIT_BURST", 20.0)?,

            scraper_timeout: Duration::from_secs(parse_env_or("SCRAPER_TIMEOUT_SECS", 30)?),
            scraper_max_retries: parse_env_or("SCRAPER_MAX_RETRIES", 3)?,
            scraper_retry_backoff: Duration::from_millis(parse_env_or("SCRAPER_RETRY_BACKOFF_MS", 2000)?),
            scraper_user_agent: env::var("SCRAPER_USER_AGENT").unwrap_or_else(|_| "playlist-scout-bot/1.0".to_string()),
            scraper_max_content_bytes: parse_env_or("SCRAPER_MAX_CONTENT_BYTES", 10 * 1024 * 1024)?,

            catalog_api_base_url: env::var("CATALOG_API_BASE_URL").unwrap_or_else(|_| "https://api.spotify.com".to_string()),
            catalog_embed_host: env::var("CATALOG_EMBED_HOST").unwrap_or_else(|_| "open.spotify.com".to_string()),
            catalog_bearer_token: env::var("CATALOG_BEARER_TOKEN").unwrap_or_default(),

            csrf_token_ttl: Duration::from_secs(parse_env_or("CSRF_TOKEN_TTL_SECS", 86_400)?),
            csrf_sweep_interval: Duration::from_secs(parse_env_or("CSRF_SWEEP_INTERVAL_SECS", 3_600)?),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").ok().map(|s| {
                s.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
            }),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
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
