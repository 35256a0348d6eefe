//! Forum settings and route table endpoints.

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::content::NodeId;
use crate::error::{AppError, AppResult};
use crate::request::RequestContext;
use crate::routing::{ForumRoute, RouteMatch};
use crate::settings::ForumSettings;
use crate::state::AppState;

/// Create the forum API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/forum/settings", get(current_settings))
        .route("/api/forum/settings/{node_id}", get(node_settings))
        .route("/api/forum/routes", get(list_routes))
        .route("/api/forum/routes/match", get(match_route))
}

/// Query for the settings endpoint.
#[derive(Debug, Deserialize)]
pub struct SettingsQuery {
    /// Published URL of a page inside the forum. Defaults to the request path.
    pub path: Option<String>,
}

/// Query for the route match endpoint.
#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub path: String,
}

/// Settings of the forum the given page (or the current request) belongs to.
async fn current_settings(
    State(state): State<AppState>,
    Extension(ctx): Extension<Arc<RequestContext>>,
    Query(query): Query<SettingsQuery>,
) -> AppResult<Json<ForumSettings>> {
    let service = state.forum().settings();

    let settings = match query.path.as_deref() {
        Some(path) => {
            let node = state
                .content()
                .node_by_url(path)
                .ok_or(AppError::NotFound)?;
            service.for_node(&ctx, node.id)
        }
        None => service.for_current_request(&ctx),
    };

    settings
        .map(|s| Json(ForumSettings::clone(&s)))
        .ok_or(AppError::NotFound)
}

/// Settings of the forum containing node `node_id`.
async fn node_settings(
    State(state): State<AppState>,
    Extension(ctx): Extension<Arc<RequestContext>>,
    Path(node_id): Path<i64>,
) -> AppResult<Json<ForumSettings>> {
    let id = NodeId(node_id);
    if state.content().node(id).is_none() {
        return Err(AppError::NotFound);
    }

    state
        .forum()
        .settings()
        .for_node(&ctx, id)
        .map(|s| Json(ForumSettings::clone(&s)))
        .ok_or(AppError::NotFound)
}

/// All routes currently registered, in match order.
async fn list_routes(State(state): State<AppState>) -> Json<Vec<ForumRoute>> {
    Json(state.routes().snapshot().routes().to_vec())
}

/// Match a path against the route table.
async fn match_route(
    State(state): State<AppState>,
    Query(query): Query<MatchQuery>,
) -> AppResult<Json<RouteMatch>> {
    if query.path.trim().is_empty() {
        return Err(AppError::BadRequest("path must not be empty".to_string()));
    }

    state
        .routes()
        .match_path(&query.path)
        .map(Json)
        .ok_or(AppError::NotFound)
}
