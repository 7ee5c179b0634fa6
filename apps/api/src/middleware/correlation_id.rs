//! Correlation ID middleware
//!
//! Stamps every request with a short random ID, carried in the request
//! extensions for downstream handlers/logging and echoed back on the
//! response as `X-Correlation-ID`.

use axum::{
    body::Body,
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use rand::RngCore;

static CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

/// Per-request correlation ID, attached to `Request::extensions()`.
#[derive(Debug, Clone)]
pub struct CorrelationId(pub String);

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn generate() -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub async fn correlation_id(mut request: Request<Body>, next: Next) -> Response {
    let id = CorrelationId(generate());
    request.extensions_mut().insert(id.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id.0) {
        response.headers_mut().insert(CORRELATION_ID_HEADER.clone(), value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::Request as HttpRequest, middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn handler(ext: axum::Extension<CorrelationId>) -> String {
        ext.0 .0.clone()
    }

    fn app() -> Router {
        Router::new().route("/", get(handler)).layer(middleware::from_fn(correlation_id))
    }

    #[tokio::test]
    async fn test_response_carries_correlation_id_header() {
        let response = app().oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();
        assert!(response.headers().contains_key("x-correlation-id"));
    }

    #[tokio::test]
    async fn test_correlation_id_is_sixteen_hex_chars() {
        let response = app().oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();
        let id = response.headers().get("x-correlation-id").unwrap().to_str().unwrap();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_successive_requests_get_distinct_ids() {
        let app = app();
        let r1 = app.clone().oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();
        let r2 = app.oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();
        let id1 = r1.headers().get("x-correlation-id").unwrap().to_str().unwrap().to_string();
        let id2 = r2.headers().get("x-correlation-id").unwrap().to_str().unwrap().to_string();
        assert_ne!(id1, id2);
    }
}
