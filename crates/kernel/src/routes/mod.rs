//! HTTP route handlers.

pub mod forum;
pub mod health;
pub mod members;
pub mod notifications;
pub mod pages;

use axum::Router;

use crate::state::AppState;

/// Build the application router with every kernel route and the
/// request-scope middleware.
///
/// Paths not claimed by an API route fall through to [`pages::page`].
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(forum::router())
        .merge(notifications::router())
        .merge(members::router())
        .fallback(pages::page)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::request_scope,
        ))
        .with_state(state)
}
