//! Input validation middleware
//!
//! Rejects any request whose path or query string matches a known
//! attack-pattern substring before it reaches a handler. This is a
//! blunt, blacklist-based defense-in-depth layer; it does not replace
//! proper parsing/escaping in the handlers themselves.

use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Case-insensitive substrings that are never legitimate in a path or
/// query string for this API.
const SUSPICIOUS_PATTERNS: &[&str] = &[
    "<script",
    "javascript:",
    "vbscript:",
    "onload=",
    "onerror=",
    "onclick=",
    "../",
    "..\\",
    "union select",
    "drop table",
    "insert into",
    "delete from",
    "select",
    "union",
    "insert",
    "delete",
    "update",
    "drop",
    "create",
    "alter",
    "exec",
    "execute",
    "--",
    "/*",
    "*/",
    "xp_cmdshell",
    ";",
    "|",
    "||",
    "&",
    "&&",
    "`",
    "$(",
    "${",
    "'",
    "\"",
    "<%",
    "%>",
    "<?",
    "?>",
];

fn is_suspicious(value: &str) -> bool {
    let lower = value.to_lowercase();
    SUSPICIOUS_PATTERNS.iter().any(|pattern| lower.contains(pattern))
}

pub async fn validate_input(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path();
    if is_suspicious(path) {
        return ApiError::Validation(format!("suspicious pattern in path: {path}")).into_response();
    }

    if let Some(query) = request.uri().query() {
        if is_suspicious(query) {
            return ApiError::Validation("suspicious pattern in query string".to_string()).into_response();
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn handler() -> &'static str {
        "OK"
    }

    fn app() -> Router {
        Router::new().route("/*path", get(handler)).layer(middleware::from_fn(validate_input))
    }

    #[tokio::test]
    async fn test_clean_path_passes_through() {
        let response = app().oneshot(HttpRequest::builder().uri("/artists/radiohead").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_script_tag_in_query_is_rejected() {
        let response = app()
            .oneshot(HttpRequest::builder().uri("/search?q=%3Cscript%3Ealert(1)").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_path_traversal_is_rejected() {
        let response = app().oneshot(HttpRequest::builder().uri("/../../etc/passwd").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_sql_keywords_detected_case_insensitively() {
        assert!(is_suspicious("'; DROP TABLE users; --"));
        assert!(is_suspicious("UNION SELECT password FROM users"));
    }

    #[test]
    fn test_standalone_sql_keyword_detected() {
        assert!(is_suspicious("SELECT * FROM users"));
        assert!(is_suspicious("CREATE TABLE evil (id int)"));
        assert!(is_suspicious("ALTER USER admin"));
    }

    #[test]
    fn test_shell_metacharacters_detected() {
        assert!(is_suspicious("a && rm -rf"));
        assert!(is_suspicious("a || true"));
        assert!(is_suspicious("${PATH}"));
    }

    #[test]
    fn test_ordinary_text_is_not_suspicious() {
        assert!(!is_suspicious("The Beatles"));
        assert!(!is_suspicious("radiohead-top-tracks"));
    }
}
