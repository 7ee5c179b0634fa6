use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, Method},
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod middleware;
mod models;
mod routes;
mod state;

use playlist_scout_catalog_client::{CatalogConfig, HttpCatalogClient};
use playlist_scout_core::{PlaylistManager, ScraperConfig, ScraperEngine};

use middleware::{correlation_id, request_log, security_headers, CsrfStore, RateLimitConfig, RateLimiter, SecurityHeadersConfig};
use routes::{api_router, health_router, HealthState};
use state::AppState;

/// Build the CORS layer based on configuration.
///
/// In production: if `CORS_ALLOWED_ORIGINS` is set, only those origins
/// are allowed; if unset, CORS requests are rejected. In development:
/// configured origins are honored, otherwise permissive CORS is used
/// for convenience.
fn build_cors_layer(config: &config::Config) -> CorsLayer {
    let is_production = config.is_production();

    match &config.cors_allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!("invalid CORS origin '{}', skipping", origin);
                        None
                    })
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::error!("no valid CORS origins configured, CORS requests will be rejected");
                CorsLayer::new()
            } else {
                tracing::info!(count = allowed_origins.len(), "CORS configured with allowed origins");
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
                    .allow_credentials(true)
                    .max_age(std::time::Duration::from_secs(3600))
            }
        }
        _ if is_production => {
            tracing::warn!("CORS_ALLOWED_ORIGINS not configured in production mode; CORS requests will be rejected");
            CorsLayer::new()
        }
        _ => {
            tracing::warn!("using permissive CORS in development mode");
            CorsLayer::permissive()
        }
    }
}

fn host_of(url: &str) -> String {
    url.trim_start_matches("https://").trim_start_matches("http://").split('/').next().unwrap_or(url).to_string()
}

async fn shutdown_signal(grace: std::time::Duration) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!(grace_secs = grace.as_secs(), "shutdown signal received, draining in-flight requests");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "playlist_scout_api=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = config::Config::from_env()?;
    tracing::info!(port = config.port, environment = %config.environment, "starting playlist-scout API");

    let catalog = Arc::new(HttpCatalogClient::new(CatalogConfig {
        api_base_url: config.catalog_api_base_url.clone(),
        bearer_token: config.catalog_bearer_token.clone(),
    })?);

    let playlists = Arc::new(PlaylistManager::new(catalog.clone()));

    let scraper_config = ScraperConfig {
        max_retries: config.scraper_max_retries,
        retry_backoff: config.scraper_retry_backoff,
        timeout: config.scraper_timeout,
        max_content_size: config.scraper_max_content_bytes,
        user_agent: config.scraper_user_agent.clone(),
    };
    let scraper = Arc::new(ScraperEngine::new(catalog.clone(), scraper_config)?);

    let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig::new(config.rate_limit_rps, config.rate_limit_burst)));
    rate_limiter.clone().spawn_sweeper(std::time::Duration::from_secs(300));

    let csrf_store = Arc::new(CsrfStore::new(config.csrf_token_ttl));
    csrf_store.clone().spawn_sweeper(config.csrf_sweep_interval);

    let security_headers_config = SecurityHeadersConfig {
        catalog_api_host: host_of(&config.catalog_api_base_url),
        catalog_embed_host: config.catalog_embed_host.clone(),
        is_production: config.is_production(),
    };

    let app_state = AppState {
        catalog: catalog.clone(),
        playlists,
        scraper,
        rate_limiter,
        csrf_store,
        security_headers: security_headers_config.clone(),
        authenticated: !config.catalog_bearer_token.is_empty(),
    };

    let cors_layer = build_cors_layer(&config);
    let health_state = HealthState::new(Arc::new(config.clone()));

    let app = Router::new()
        .nest("/health", health_router(health_state))
        .nest("/api", api_router(app_state))
        .layer(cors_layer)
        .layer(from_fn_with_state(security_headers_config, security_headers))
        .layer(from_fn(request_log))
        .layer(from_fn(correlation_id))
        .into_make_service_with_connect_info::<SocketAddr>();

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal(config.shutdown_grace)).await?;

    Ok(())
}
