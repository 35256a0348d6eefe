//! Published page lookup.
//!
//! Serves any path not claimed by the API: forum virtual routes first, then
//! content nodes by URL. Responses describe what would be rendered together
//! with the settings of the owning forum.

use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::Uri};
use serde::Serialize;

use crate::content::ContentNode;
use crate::error::{AppError, AppResult};
use crate::request::RequestContext;
use crate::routing::RouteMatch;
use crate::settings::ForumSettings;
use crate::state::AppState;

/// A resolved page.
#[derive(Debug, Serialize)]
pub struct PageResponse {
    /// Content node at this URL, for published pages.
    pub node: Option<ContentNode>,
    /// Forum route that claimed the path, for virtual pages.
    pub route: Option<RouteMatch>,
    /// Settings of the forum the page belongs to.
    pub forum: Option<ForumSettings>,
}

/// Fallback handler resolving a request path to a page.
pub async fn page(
    State(state): State<AppState>,
    Extension(ctx): Extension<Arc<RequestContext>>,
    uri: Uri,
) -> AppResult<Json<PageResponse>> {
    let service = state.forum().settings();

    if let Some(matched) = state.routes().match_path(uri.path()) {
        let forum = service.for_node(&ctx, matched.route.forum_id);
        return Ok(Json(PageResponse {
            node: None,
            forum: forum.map(|s| ForumSettings::clone(&s)),
            route: Some(matched),
        }));
    }

    let node = ctx.current_node().ok_or(AppError::NotFound)?;
    let forum = service.for_current_request(&ctx);

    Ok(Json(PageResponse {
        node: Some(ContentNode::clone(&node)),
        route: None,
        forum: forum.map(|s| ForumSettings::clone(&s)),
    }))
}
