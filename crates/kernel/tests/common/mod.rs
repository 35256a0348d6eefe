#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! This module builds the REAL kernel state and router around the standard
//! fixture site from `colloquy-test-utils`. Every test gets its own
//! [`TestApp`]; nothing is shared between tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use colloquy_kernel::members::MemoryMemberStore;
use colloquy_kernel::request::RequestContext;
use colloquy_kernel::settings::ForumOptions;
use colloquy_kernel::{AppState, Config};
use colloquy_test_utils::{STARTING_GROUP, forum_tree};

/// Host header sent with every request.
pub const TEST_HOST: &str = "forum.test";

/// Badge types reported by the member store's badge sync.
pub const BADGE_TYPES: usize = 3;

/// Configuration used by every test app.
pub fn test_config() -> Config {
    Config {
        port: 0,
        content_fixture: PathBuf::from("unused.json"),
        site_domain: "http://localhost".to_string(),
        forum_root_alias: ForumOptions::DEFAULT_ROOT_ALIAS.to_string(),
        default_member_group: ForumOptions::DEFAULT_MEMBER_GROUP.to_string(),
        cors_allowed_origins: vec!["*".to_string()],
    }
}

/// Member store seeded with the fixture groups.
pub fn seeded_members() -> MemoryMemberStore {
    let members = MemoryMemberStore::new();
    members.add_group(STARTING_GROUP);
    members.add_group(ForumOptions::DEFAULT_MEMBER_GROUP);
    members.set_badge_types(BADGE_TYPES);
    members
}

/// Test application wrapper using the REAL kernel routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a test application over the fixture site.
    pub async fn new() -> Self {
        Self::with_members(seeded_members()).await
    }

    /// Create a test application over the fixture site and a given member store.
    pub async fn with_members(members: MemoryMemberStore) -> Self {
        let state = AppState::with_content(&test_config(), Arc::new(forum_tree()), members).await;
        let router = colloquy_kernel::routes::app(state.clone());
        Self { router, state }
    }

    pub fn members(&self) -> &MemoryMemberStore {
        self.state.members()
    }

    /// A request context like the one `request_scope` builds.
    pub fn context(&self) -> RequestContext {
        RequestContext::new(Arc::clone(self.state.content()), format!("http://{TEST_HOST}"))
    }

    /// Number of route table rebuilds since startup (the startup build included).
    pub fn rebuilds(&self) -> u64 {
        self.state.forum().route_coordinator().rebuild_count()
    }

    /// Send a request through the router.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(
            Request::builder()
                .uri(uri)
                .header(header::HOST, TEST_HOST)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> Response {
        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::HOST, TEST_HOST)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.request(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .header(header::HOST, TEST_HOST)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

/// Collect a response body as a string.
pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let body = body_string(response).await;
    serde_json::from_str(&body).unwrap_or_else(|e| panic!("invalid JSON ({e}): {body}"))
}
