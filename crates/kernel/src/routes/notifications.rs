//! Content cache notification endpoint.
//!
//! Stands in for the host's cache refresher broadcast: each posted
//! notification is dispatched to the registered content-changed handlers
//! with the current request's context.

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::State,
    routing::post,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::events::ChangeNotification;
use crate::request::RequestContext;
use crate::state::AppState;

/// Create the notifications router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/content/notifications", post(receive))
}

/// Notification batch response.
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub received: usize,
    /// Whether the route table will be rebuilt when this request ends.
    pub routes_dirty: bool,
}

async fn receive(
    State(state): State<AppState>,
    Extension(ctx): Extension<Arc<RequestContext>>,
    Json(notifications): Json<Vec<ChangeNotification>>,
) -> AppResult<Json<NotificationResponse>> {
    if notifications.is_empty() {
        return Err(AppError::BadRequest(
            "at least one notification is required".to_string(),
        ));
    }

    for notification in &notifications {
        state.registry().content_changed(Some(&ctx), notification);
    }

    tracing::debug!(count = notifications.len(), "content notifications dispatched");

    Ok(Json(NotificationResponse {
        received: notifications.len(),
        routes_dirty: ctx.routes_dirty(),
    }))
}
