//! Member save and delete endpoints.
//!
//! These play the host's member service: the record is written to the store
//! and the registered member handlers run around the write.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::members::{DeleteDecision, Member, MemberId, PROP_MEMBER_EMAIL, PROP_MEMBER_SLUG};
use crate::state::AppState;

/// Create the members router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/members", post(save_member))
        .route("/api/members/{id}", get(get_member).delete(delete_member))
}

/// Request body for saving a member.
#[derive(Debug, Deserialize)]
pub struct SaveMemberRequest {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Member type schema. Defaults to the forum member type.
    pub properties: Option<HashMap<String, Value>>,
}

impl SaveMemberRequest {
    fn into_member(self) -> Member {
        let properties = self.properties.unwrap_or_else(|| {
            HashMap::from([
                (PROP_MEMBER_EMAIL.to_string(), Value::Null),
                (PROP_MEMBER_SLUG.to_string(), Value::Null),
            ])
        });

        Member {
            id: MemberId(self.id),
            username: self.username,
            email: self.email,
            properties,
        }
    }
}

/// Save a member and run the save handlers.
async fn save_member(
    State(state): State<AppState>,
    Json(request): Json<SaveMemberRequest>,
) -> AppResult<Json<Member>> {
    if request.username.trim().is_empty() {
        return Err(AppError::BadRequest("username is required".to_string()));
    }
    if request.email.trim().is_empty() {
        return Err(AppError::BadRequest("email is required".to_string()));
    }

    let mut member = request.into_member();
    let id = member.id;
    let store = state.members();

    // Keep the stored slug so the save handler can reuse it.
    if member.slug().is_none()
        && let Some(slug) = store
            .member(id)
            .and_then(|existing| existing.slug().map(str::to_string))
    {
        member.set_property(PROP_MEMBER_SLUG, slug);
    }

    store.insert(member.clone());
    state
        .registry()
        .members_saved(std::slice::from_mut(&mut member))
        .await;

    store.member(id).map(Json).ok_or(AppError::NotFound)
}

async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Member>> {
    state
        .members()
        .member(MemberId(id))
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// Delete a member unless a deleting handler vetoes it.
async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let id = MemberId(id);
    let member = state.members().member(id).ok_or(AppError::NotFound)?;

    match state.registry().members_deleting(&[member]).await {
        DeleteDecision::Proceed => {
            state.members().remove(id);
            tracing::info!(member = %id, "member deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        DeleteDecision::Cancelled { reason, .. } => Err(AppError::Conflict(reason)),
    }
}
