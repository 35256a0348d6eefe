//! Per-request forum context.
//!
//! Wraps every request in a [`RequestContext`] so handlers share one
//! memoization cache and one route-rebuild flag, then runs the end-of-request
//! handlers once the response has been produced.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};

use crate::request::RequestContext;
use crate::state::AppState;

/// Header set by reverse proxies that terminate TLS.
const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Middleware creating the request context.
///
/// The current node is the published node whose URL matches the request
/// path, if any. The context is available to handlers as
/// `Extension<Arc<RequestContext>>`.
pub async fn request_scope(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let domain = request_domain(&request).unwrap_or_else(|| state.config().site_domain.clone());

    let mut ctx = RequestContext::new(Arc::clone(state.content()), domain);
    if let Some(node) = state.content().node_by_url(request.uri().path()) {
        tracing::debug!(node = %node.id, path = %request.uri().path(), "request maps to content node");
        ctx = ctx.with_current_node(node.id);
    }

    let ctx = Arc::new(ctx);
    request.extensions_mut().insert(Arc::clone(&ctx));

    let response = next.run(request).await;

    state.registry().request_ended(&ctx);
    response
}

/// Scheme and host of the request, from the Host header.
fn request_domain(request: &Request<Body>) -> Option<String> {
    let headers = request.headers();
    let host = headers.get(header::HOST)?.to_str().ok()?.trim();
    if host.is_empty() {
        return None;
    }

    let scheme = headers
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("http");

    Some(format!("{scheme}://{host}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri("/forum");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn domain_from_host() {
        let req = request(&[("host", "forum.example.com")]);
        assert_eq!(
            request_domain(&req).as_deref(),
            Some("http://forum.example.com")
        );
    }

    #[test]
    fn domain_honours_forwarded_proto() {
        let req = request(&[("host", "forum.example.com"), ("x-forwarded-proto", "https")]);
        assert_eq!(
            request_domain(&req).as_deref(),
            Some("https://forum.example.com")
        );
    }

    #[test]
    fn no_host_header() {
        assert!(request_domain(&request(&[])).is_none());
    }
}
