//! Per-IP token-bucket rate limiting middleware
//!
//! No cross-restart state is required, so the limiter lives entirely
//! in-process over a `DashMap` rather than a shared external store.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use dashmap::DashMap;
use playlist_scout_core::Bucket;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Token-bucket configuration
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Tokens refilled per second
    pub rate: f64,
    /// Bucket capacity
    pub burst: f64,
}

impl RateLimitConfig {
    pub fn new(rate: f64, burst: f64) -> Self {
        RateLimitConfig { rate, burst }
    }
}

/// Per-client token bucket admission, shared across requests.
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<DashMap<String, Bucket>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        RateLimiter {
            buckets: Arc::new(DashMap::new()),
            config,
        }
    }

    /// Create the bucket on first sight (full), refill based on elapsed
    /// wall-clock time since last refill (saturating at `burst`), then
    /// attempt to deduct one token. The whole operation is serialized
    /// per-key by `DashMap`'s shard locking; different IPs proceed
    /// without contending on the same lock.
    pub fn allow(&self, ip: &str) -> bool {
        let now = Utc::now();
        let mut bucket = self
            .buckets
            .entry(ip.to_string())
            .or_insert_with(|| Bucket::new(self.config.rate, self.config.burst, now));

        let elapsed_secs = (now - bucket.last_refill).num_milliseconds().max(0) as f64 / 1000.0;
        bucket.tokens = (bucket.tokens + elapsed_secs * bucket.rate).min(bucket.burst);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Drop a client's bucket entirely.
    pub fn reset(&self, ip: &str) {
        self.buckets.remove(ip);
    }

    /// Remove buckets that look unused: tokens refilled back to burst
    /// capacity. This is only an approximation of "unused recently" — a
    /// bucket can refill to full between sweeps despite receiving
    /// traffic.
    pub fn sweep(&self) {
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| !bucket.is_sweep_candidate());
        let evicted = before - self.buckets.len();
        if evicted > 0 {
            debug!(evicted, "rate limiter sweep evicted idle buckets");
        }
    }

    /// Spawn the background sweeper. Never holds the map across I/O;
    /// `retain` is the only mutating call and it never awaits.
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

/// Extract client IP: `X-Forwarded-For` first entry, then `X-Real-IP`,
/// then the connection's remote address.
pub fn extract_client_ip(headers: &HeaderMap, connect_info: Option<&ConnectInfo<std::net::SocketAddr>>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(ip) = value.split(',').next() {
                let ip = ip.trim();
                if ip.parse::<IpAddr>().is_ok() {
                    return ip.to_string();
                }
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(value) = real_ip.to_str() {
            let ip = value.trim();
            if ip.parse::<IpAddr>().is_ok() {
                return ip.to_string();
            }
        }
    }

    if let Some(connect_info) = connect_info {
        return connect_info.0.ip().to_string();
    }

    warn!("could not determine client IP for rate limiting");
    "unknown".to_string()
}

/// Axum middleware applying [`RateLimiter::allow`] to every request.
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    ConnectInfo(addr): ConnectInfo<std::net::SocketAddr>,
    headers: HeaderMap,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client_ip = extract_client_ip(&headers, Some(&ConnectInfo(addr)));

    if limiter.allow(&client_ip) {
        next.run(request).await
    } else {
        debug!(ip = %client_ip, "rate limit denied request");
        ApiError::RateLimitedLocal.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_client_ip_from_x_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.1, 10.0.0.1"));
        assert_eq!(extract_client_ip(&headers, None), "203.0.113.1");
    }

    #[test]
    fn test_extract_client_ip_from_x_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.42"));
        assert_eq!(extract_client_ip(&headers, None), "198.51.100.42");
    }

    #[test]
    fn test_extract_client_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.42"));
        assert_eq!(extract_client_ip(&headers, None), "203.0.113.1");
    }

    #[test]
    fn test_extract_client_ip_invalid_falls_through() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.42"));
        assert_eq!(extract_client_ip(&headers, None), "198.51.100.42");
    }

    #[test]
    fn test_burst_then_deny() {
        let limiter = RateLimiter::new(RateLimitConfig::new(1.0, 1.0));
        assert!(limiter.allow("1.2.3.4"));
        assert!(!limiter.allow("1.2.3.4"));
    }

    #[test]
    fn test_different_ips_independent() {
        let limiter = RateLimiter::new(RateLimitConfig::new(1.0, 1.0));
        assert!(limiter.allow("1.2.3.4"));
        assert!(limiter.allow("5.6.7.8"));
    }

    #[test]
    fn test_reset_clears_bucket() {
        let limiter = RateLimiter::new(RateLimitConfig::new(1.0, 1.0));
        assert!(limiter.allow("1.2.3.4"));
        assert!(!limiter.allow("1.2.3.4"));
        limiter.reset("1.2.3.4");
        assert!(limiter.allow("1.2.3.4"));
    }

    #[test]
    fn test_sweep_evicts_full_buckets() {
        let limiter = RateLimiter::new(RateLimitConfig::new(1.0, 1.0));
        limiter.allow("1.2.3.4");
        limiter.reset("1.2.3.4");
        // freshly-created bucket starts at full capacity
        assert!(limiter.allow("1.2.3.4"));
        limiter.buckets.get_mut("1.2.3.4").unwrap().tokens = 1.0;
        limiter.sweep();
        assert!(limiter.buckets.is_empty());
    }
}
