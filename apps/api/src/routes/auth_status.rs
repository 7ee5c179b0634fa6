//! `GET /api/auth-status`
//!
//! The OAuth authorization-code flow with the catalog is out of scope
//! (§1 Non-goals); this reports whether a bearer token was configured,
//! not whether a user session exists.

use axum::extract::State;
use axum::Json;

use crate::models::AuthStatusResponse;
use crate::state::AppState;

pub async fn auth_status(State(state): State<AppState>) -> Json<AuthStatusResponse> {
    Json(AuthStatusResponse { authenticated: state.authenticated })
}
