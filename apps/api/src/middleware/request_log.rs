//! Request logging middleware
//!
//! Logs a debug-level "start" event before the handler runs and an
//! info/warn/error "complete" event after, tiered by response status,
//! carrying the method, path, client IP, user agent, duration, and the
//! correlation ID stamped by [`super::correlation_id`].

use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, info, warn};

use super::correlation_id::CorrelationId;
use super::rate_limit::extract_client_ip;

fn user_agent(headers: &HeaderMap) -> &str {
    headers.get("user-agent").and_then(|v| v.to_str().ok()).unwrap_or("-")
}

pub async fn request_log(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let user_agent = user_agent(request.headers()).to_string();
    let connect_info = request.extensions().get::<ConnectInfo<std::net::SocketAddr>>().cloned();
    let client_ip = extract_client_ip(request.headers(), connect_info.as_ref());
    let correlation_id = request.extensions().get::<CorrelationId>().cloned().map(|c| c.0).unwrap_or_default();

    debug!(
        method = %method,
        path = %path,
        client_ip = %client_ip,
        correlation_id = %correlation_id,
        "request start"
    );

    let start = Instant::now();
    let response = next.run(request).await;
    let duration_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    if status >= 500 {
        error!(
            method = %method, path = %path, client_ip = %client_ip, user_agent = %user_agent,
            status, duration_ms, correlation_id = %correlation_id, "request complete"
        );
    } else if status >= 400 {
        warn!(
            method = %method, path = %path, client_ip = %client_ip, user_agent = %user_agent,
            status, duration_ms, correlation_id = %correlation_id, "request complete"
        );
    } else {
        info!(
            method = %method, path = %path, client_ip = %client_ip, user_agent = %user_agent,
            status, duration_ms, correlation_id = %correlation_id, "request complete"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::Request as HttpRequest, middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn ok_handler() -> &'static str {
        "OK"
    }

    async fn error_handler() -> axum::http::StatusCode {
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    }

    #[tokio::test]
    async fn test_successful_request_passes_through() {
        let app = Router::new().route("/", get(ok_handler)).layer(middleware::from_fn(request_log));
        let response = app.oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_server_error_still_returns_response() {
        let app = Router::new().route("/", get(error_handler)).layer(middleware::from_fn(request_log));
        let response = app.oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_user_agent_defaults_to_dash_when_absent() {
        let headers = HeaderMap::new();
        assert_eq!(user_agent(&headers), "-");
    }
}
