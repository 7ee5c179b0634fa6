//! Health check HTTP route handlers
//!
//! - `GET /health` - simple liveness check
//! - `GET /health/live` - Kubernetes-style liveness probe
//! - `GET /health/ready` - readiness check (catalog configuration present)

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::config::Config;

#[derive(Clone)]
pub struct HealthState {
    pub config: Arc<Config>,
}

impl HealthState {
    pub fn new(config: Arc<Config>) -> Self {
        HealthState { config }
    }
}

pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/", get(simple_health))
        .route("/live", get(liveness_probe))
        .route("/ready", get(readiness_probe))
        .with_state(state)
}

async fn simple_health() -> &'static str {
    "OK"
}

async fn liveness_probe() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Serialize)]
struct ReadinessResponse {
    ready: bool,
    catalog_configured: bool,
}

/// Readiness does not reach out to the catalog (no network round trip
/// for a probe); it only checks that the bearer token this process
/// needs to talk to it was actually supplied.
async fn readiness_probe(State(state): State<HealthState>) -> impl IntoResponse {
    let catalog_configured = !state.config.catalog_bearer_token.is_empty();

    let status = if catalog_configured { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (status, Json(ReadinessResponse { ready: catalog_configured, catalog_configured }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simple_health() {
        assert_eq!(simple_health().await, "OK");
    }

    #[tokio::test]
    async fn test_liveness_probe_returns_ok() {
        let response = liveness_probe().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
