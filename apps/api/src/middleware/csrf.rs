//! CSRF protection middleware
//!
//! An in-memory token store (no persistence Non-goal, same rationale as
//! the rate limiter) issued via `GET /api/csrf-token` and required on
//! every state-changing request. Tokens are 32 random bytes, URL-safe
//! base64 encoded, checked against the `X-CSRF-Token` header or a
//! `csrf_token` form field, and expire after a configurable TTL swept
//! out on an interval.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header::CONTENT_TYPE, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::RngCore;
use tracing::debug;

use crate::error::ApiError;

const CSRF_HEADER: &str = "x-csrf-token";
const MAX_FORM_BODY_BYTES: usize = 1024 * 1024;

/// Shared token store, handed to both the issuing route and this
/// middleware via axum state.
#[derive(Clone)]
pub struct CsrfStore {
    tokens: Arc<DashMap<String, DateTime<Utc>>>,
    ttl: chrono::Duration,
}

impl CsrfStore {
    pub fn new(ttl: Duration) -> Self {
        CsrfStore {
            tokens: Arc::new(DashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::hours(24)),
        }
    }

    /// Mint a fresh token and register its expiry.
    pub fn issue(&self) -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = URL_SAFE_NO_PAD.encode(bytes);
        self.tokens.insert(token.clone(), Utc::now() + self.ttl);
        token
    }

    /// Check a token and evict it if expired. Valid tokens are
    /// intentionally not single-use: the contract is "not expired",
    /// not "not yet redeemed".
    pub fn validate(&self, token: &str) -> bool {
        let valid = match self.tokens.get(token) {
            Some(expiry) => Utc::now() < *expiry,
            None => false,
        };
        if !valid {
            self.tokens.remove(token);
        }
        valid
    }

    pub fn sweep(&self) {
        let now = Utc::now();
        let before = self.tokens.len();
        self.tokens.retain(|_, expiry| *expiry > now);
        let evicted = before - self.tokens.len();
        if evicted > 0 {
            debug!(evicted, "csrf token sweep evicted expired tokens");
        }
    }

    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.sweep();
            }
        })
    }
}

fn requires_csrf(method: &Method) -> bool {
    matches!(method, &Method::POST | &Method::PUT | &Method::DELETE | &Method::PATCH)
}

fn form_token(body: &[u8]) -> Option<String> {
    url::form_urlencoded::parse(body).find(|(k, _)| k == "csrf_token").map(|(_, v)| v.into_owned())
}

pub async fn csrf_protection(State(store): State<Arc<CsrfStore>>, request: Request<Body>, next: Next) -> Response {
    if !requires_csrf(request.method()) {
        return next.run(request).await;
    }

    if let Some(header_value) = request.headers().get(CSRF_HEADER).and_then(|v| v.to_str().ok()) {
        return if store.validate(header_value) {
            next.run(request).await
        } else {
            ApiError::CsrfInvalid.into_response()
        };
    }

    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if !is_form {
        return ApiError::CsrfInvalid.into_response();
    }

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_FORM_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return ApiError::Validation("request body too large".to_string()).into_response(),
    };

    match form_token(&bytes) {
        Some(token) if store.validate(&token) => {
            let rebuilt = Request::from_parts(parts, Body::from(bytes));
            next.run(rebuilt).await
        }
        _ => ApiError::CsrfInvalid.into_response(),
    }
}
