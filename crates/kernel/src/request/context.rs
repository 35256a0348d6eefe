//! Explicit per-request context.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::RequestCache;
use crate::content::{ContentNode, ContentStore, NodeId};

/// State valid for exactly one inbound request.
///
/// Shared by reference between the request handler, notification handlers
/// that fire during the request, and the end-of-request hook. Interior
/// mutability keeps it usable from `&self` when the host serves the request
/// on a pool worker.
pub struct RequestContext {
    /// Published content snapshot (None outside a request).
    content: Option<Arc<dyn ContentStore>>,
    /// Content node the request is rendering, if any.
    current_node: Option<NodeId>,
    /// Scheme and host of the request, e.g. `https://example.com`.
    domain: String,
    cache: RequestCache,
    /// Set when a forum root changed during this request.
    rebuild_routes: AtomicBool,
}

impl RequestContext {
    /// Create a context for a request served against `content`.
    pub fn new(content: Arc<dyn ContentStore>, domain: impl Into<String>) -> Self {
        Self {
            content: Some(content),
            current_node: None,
            domain: domain.into(),
            cache: RequestCache::new(),
            rebuild_routes: AtomicBool::new(false),
        }
    }

    /// Create a context with no content cache.
    ///
    /// Used for work that runs outside any inbound request, such as
    /// notifications arriving on a background broadcast channel.
    pub fn detached() -> Self {
        Self {
            content: None,
            current_node: None,
            domain: String::new(),
            cache: RequestCache::new(),
            rebuild_routes: AtomicBool::new(false),
        }
    }

    /// Set the content node the request is rendering.
    pub fn with_current_node(mut self, id: NodeId) -> Self {
        self.current_node = Some(id);
        self
    }

    /// Content cache for this request, if one is available.
    pub fn content(&self) -> Option<&Arc<dyn ContentStore>> {
        self.content.as_ref()
    }

    /// ID of the node being rendered.
    pub fn current_node_id(&self) -> Option<NodeId> {
        self.current_node
    }

    /// Resolve the node being rendered from the content cache.
    pub fn current_node(&self) -> Option<Arc<ContentNode>> {
        let id = self.current_node?;
        self.content.as_ref()?.node(id)
    }

    /// Scheme and host of the request.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Request-scoped memo cache.
    pub fn cache(&self) -> &RequestCache {
        &self.cache
    }

    /// Flag the forum routes for a rebuild at the end of this request.
    ///
    /// Idempotent: any number of calls result in one rebuild.
    pub fn mark_routes_dirty(&self) {
        self.rebuild_routes.store(true, Ordering::Release);
    }

    /// Check the rebuild flag without consuming it.
    pub fn routes_dirty(&self) -> bool {
        self.rebuild_routes.load(Ordering::Acquire)
    }

    /// Read and clear the rebuild flag.
    pub fn take_routes_dirty(&self) -> bool {
        self.rebuild_routes.swap(false, Ordering::AcqRel)
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("content", &self.content.as_ref().map(|_| "ContentStore"))
            .field("current_node", &self.current_node)
            .field("domain", &self.domain)
            .field("cache", &self.cache)
            .field("rebuild_routes", &self.routes_dirty())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::content::ContentTree;

    fn context() -> RequestContext {
        RequestContext::new(Arc::new(ContentTree::default()), "https://example.com")
    }

    #[test]
    fn flag_starts_clear() {
        let ctx = context();
        assert!(!ctx.routes_dirty());
        assert!(!ctx.take_routes_dirty());
    }

    #[test]
    fn flag_is_read_once() {
        let ctx = context();
        ctx.mark_routes_dirty();
        ctx.mark_routes_dirty();
        ctx.mark_routes_dirty();

        assert!(ctx.routes_dirty());
        assert!(ctx.take_routes_dirty());
        assert!(!ctx.take_routes_dirty());
    }

    #[test]
    fn detached_context_has_no_content() {
        let ctx = RequestContext::detached().with_current_node(NodeId(3));
        assert!(ctx.content().is_none());
        assert_eq!(ctx.current_node_id(), Some(NodeId(3)));
        assert!(ctx.current_node().is_none());
    }

    #[test]
    fn current_node_missing_from_tree() {
        let ctx = context().with_current_node(NodeId(99));
        assert!(ctx.current_node().is_none());
        assert_eq!(ctx.domain(), "https://example.com");
    }
}
