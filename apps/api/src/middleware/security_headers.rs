//! Security headers middleware
//!
//! Adds HTTP security headers to all responses to protect against common
//! web vulnerabilities like clickjacking, MIME sniffing, and XSS attacks.
//!
//! Headers added:
//! - X-Content-Type-Options: prevents MIME sniffing
//! - X-Frame-Options: disables iframe embedding
//! - X-XSS-Protection: legacy reflected-XSS filter
//! - Referrer-Policy: controls referrer information sent with requests
//! - Content-Security-Policy: restricts resource loading sources
//! - Permissions-Policy: controls browser feature access
//! - Strict-Transport-Security: added only when serving over TLS

use axum::{
    body::Body,
    extract::State,
    http::{header::HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

static X_FRAME_OPTIONS: HeaderName = HeaderName::from_static("x-frame-options");
static X_CONTENT_TYPE_OPTIONS: HeaderName = HeaderName::from_static("x-content-type-options");
static X_XSS_PROTECTION: HeaderName = HeaderName::from_static("x-xss-protection");
static REFERRER_POLICY: HeaderName = HeaderName::from_static("referrer-policy");
static CONTENT_SECURITY_POLICY: HeaderName = HeaderName::from_static("content-security-policy");
static PERMISSIONS_POLICY: HeaderName = HeaderName::from_static("permissions-policy");
static STRICT_TRANSPORT_SECURITY: HeaderName = HeaderName::from_static("strict-transport-security");

/// Configuration for the security headers middleware: the catalog's API
/// and embed hosts are permitted in the CSP `connect-src`/`frame-src` so
/// the app can call the catalog API and embed its playlist widget.
#[derive(Debug, Clone)]
pub struct SecurityHeadersConfig {
    pub catalog_api_host: String,
    pub catalog_embed_host: String,
    pub is_production: bool,
}

impl SecurityHeadersConfig {
    fn build_csp(&self) -> String {
        format!(
            "default-src 'self'; \
             script-src 'self'; \
             style-src 'self' 'unsafe-inline'; \
             img-src 'self' data: https://{embed}; \
             connect-src 'self' https://{api}; \
             frame-src 'self' https://{embed}; \
             font-src 'self'; \
             frame-ancestors 'none'",
            api = self.catalog_api_host,
            embed = self.catalog_embed_host,
        )
    }
}

/// Security headers middleware. HSTS is only added when `is_production`
/// is set (the server is assumed to sit behind TLS termination there).
pub async fn security_headers(State(config): State<SecurityHeadersConfig>, request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS.clone(), HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS.clone(), HeaderValue::from_static("nosniff"));
    headers.insert(X_XSS_PROTECTION.clone(), HeaderValue::from_static("1; mode=block"));
    headers.insert(REFERRER_POLICY.clone(), HeaderValue::from_static("strict-origin-when-cross-origin"));

    if let Ok(csp) = HeaderValue::from_str(&config.build_csp()) {
        headers.insert(CONTENT_SECURITY_POLICY.clone(), csp);
    }

    headers.insert(
        PERMISSIONS_POLICY.clone(),
        HeaderValue::from_static("camera=(), microphone=(), geolocation=(), payment=(), usb=()"),
    );

    if config.is_production {
        headers.insert(
            STRICT_TRANSPORT_SECURITY.clone(),
            HeaderValue::from_static("max-age=63072000; includeSubDomains"),
        );
    }

    response
}
