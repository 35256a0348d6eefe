//! Health check endpoint.
//!
//! Returns 200 OK once the forum module has started.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    routes: usize,
    badges_synced: bool,
}

/// Health check handler.
///
/// A failed badge sync is reported but does not make the service unhealthy.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        routes: state.routes().len(),
        badges_synced: state.startup().badges.is_some(),
    })
}

/// Create the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
