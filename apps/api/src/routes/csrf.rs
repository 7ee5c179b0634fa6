//! `GET /api/csrf-token`

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::middleware::CsrfStore;
use crate::models::CsrfTokenResponse;

pub async fn csrf_token(State(store): State<Arc<CsrfStore>>) -> Json<CsrfTokenResponse> {
    Json(CsrfTokenResponse { csrf_token: store.issue() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_issues_nonempty_token() {
        let store = Arc::new(CsrfStore::new(Duration::from_secs(3600)));
        let response = csrf_token(State(store)).await;
        assert!(!response.0.csrf_token.is_empty());
    }

    #[tokio::test]
    async fn test_successive_tokens_are_distinct() {
        let store = Arc::new(CsrfStore::new(Duration::from_secs(3600)));
        let a = csrf_token(State(store.clone())).await.0.csrf_token;
        let b = csrf_token(State(store)).await.0.csrf_token;
        assert_ne!(a, b);
    }
}
