//! Route rebuilds driven by content changes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use super::{ForumRoute, RouteHost, RouteKind};
use crate::content::{ContentNode, ContentStore};
use crate::request::RequestContext;
use crate::settings::ForumOptions;
use crate::settings::schema::{
    DEFAULT_MEMBER_URL_NAME, DEFAULT_PAGE_URL_NAME, DEFAULT_TOPIC_URL_NAME, PROP_MEMBER_URL_NAME,
    PROP_PAGE_URL_NAME, PROP_TOPIC_URL_NAME,
};

/// Owner name under which forum routes are registered in the host table.
pub const ROUTE_OWNER: &str = "colloquy";

/// Rebuilds the forum's routes from the content cache.
///
/// Notifications only mark the request; the rebuild happens here, once, when
/// the host calls [`end_request`](Self::end_request). That keeps the route
/// table stable while the triggering request is still being routed.
pub struct RouteRebuildCoordinator {
    host: Arc<dyn RouteHost>,
    options: Arc<ForumOptions>,
    rebuilds: AtomicU64,
}

impl RouteRebuildCoordinator {
    pub fn new(host: Arc<dyn RouteHost>, options: Arc<ForumOptions>) -> Self {
        Self {
            host,
            options,
            rebuilds: AtomicU64::new(0),
        }
    }

    /// Compute the forum routes for every root in `content`, in document order.
    pub fn build_routes(&self, content: &dyn ContentStore) -> Vec<ForumRoute> {
        content
            .nodes_of_type(&self.options.doc_types.forum_root)
            .iter()
            .flat_map(|root| routes_for_root(root))
            .collect()
    }

    /// Replace the forum's routes in the host table.
    ///
    /// Deterministic and idempotent: the same content yields the same table.
    /// Returns the number of routes registered.
    pub fn rebuild_routes(&self, content: &dyn ContentStore) -> usize {
        let routes = self.build_routes(content);
        let count = routes.len();
        self.host.replace_module_routes(ROUTE_OWNER, routes);
        self.rebuilds.fetch_add(1, Ordering::Relaxed);
        info!(routes = count, "forum routes rebuilt");
        count
    }

    /// End-of-request hook: rebuild when the request flagged a forum change.
    ///
    /// Returns whether a rebuild ran.
    pub fn end_request(&self, ctx: &RequestContext) -> bool {
        if !ctx.take_routes_dirty() {
            return false;
        }
        let Some(content) = ctx.content() else {
            debug!("route rebuild requested without a content cache, skipping");
            return false;
        };
        self.rebuild_routes(&**content);
        true
    }

    /// Number of rebuilds performed since startup.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds.load(Ordering::Relaxed)
    }
}

fn routes_for_root(root: &ContentNode) -> Vec<ForumRoute> {
    let base = root.url.trim_end_matches('/');
    let segment = |prop: &str, default: &'static str| {
        root.property_str(prop)
            .map(|s| s.trim_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let topic = segment(PROP_TOPIC_URL_NAME, DEFAULT_TOPIC_URL_NAME);
    let member = segment(PROP_MEMBER_URL_NAME, DEFAULT_MEMBER_URL_NAME);
    let page = segment(PROP_PAGE_URL_NAME, DEFAULT_PAGE_URL_NAME);

    vec![
        ForumRoute {
            name: format!("{ROUTE_OWNER}_topic_{}", root.id),
            pattern: format!("{base}/{topic}/:slug"),
            kind: RouteKind::Topic,
            forum_id: root.id,
        },
        ForumRoute {
            name: format!("{ROUTE_OWNER}_member_{}", root.id),
            pattern: format!("{base}/{member}/:slug"),
            kind: RouteKind::Member,
            forum_id: root.id,
        },
        ForumRoute {
            name: format!("{ROUTE_OWNER}_page_{}", root.id),
            pattern: format!("{base}/{page}/:page"),
            kind: RouteKind::Page,
            forum_id: root.id,
        },
    ]
}
