//! Route table with bulk per-module replacement.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

use crate::content::NodeId;

/// What a forum route renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Topic,
    Member,
    Page,
}

/// A virtual route published by a forum root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForumRoute {
    /// Unique route name, e.g. "colloquy_topic_1052".
    pub name: String,
    /// URL pattern with `:param` segments, e.g. "/forum/topic/:slug".
    pub pattern: String,
    pub kind: RouteKind,
    /// Forum root the route belongs to.
    pub forum_id: NodeId,
}

/// Result of matching a path against the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    pub route: ForumRoute,
    /// Path parameters extracted (e.g., {"slug": "welcome"})
    pub params: HashMap<String, String>,
}

/// Routes grouped by owning module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    owners: BTreeMap<String, Vec<ForumRoute>>,
    /// All routes ordered for matching.
    ordered: Vec<ForumRoute>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every route owned by `owner`.
    pub fn replace_module(&mut self, owner: &str, routes: Vec<ForumRoute>) {
        if routes.is_empty() {
            self.owners.remove(owner);
        } else {
            self.owners.insert(owner.to_string(), routes);
        }
        self.build_order();
    }

    /// Routes owned by `owner`, in insertion order.
    pub fn routes_for(&self, owner: &str) -> &[ForumRoute] {
        self.owners.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All routes in match order.
    pub fn routes(&self) -> &[ForumRoute] {
        &self.ordered
    }

    /// Match a request path. Trailing slashes are ignored.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        self.ordered.iter().find_map(|route| {
            match_pattern(&route.pattern, path).map(|params| RouteMatch {
                route: route.clone(),
                params,
            })
        })
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Sort so literal-heavy, deeper routes win; ties break on pattern text.
    fn build_order(&mut self) {
        self.ordered = self.owners.values().flatten().cloned().collect();
        self.ordered.sort_by(|a, b| {
            specificity(&a.pattern)
                .cmp(&specificity(&b.pattern))
                .then_with(|| a.pattern.cmp(&b.pattern))
                .then_with(|| a.name.cmp(&b.name))
        });
        debug!(routes = self.ordered.len(), "built route table");
    }
}

fn specificity(pattern: &str) -> (usize, i64) {
    let params = pattern.matches(':').count();
    let segments = pattern.matches('/').count() as i64;
    (params, -segments)
}

/// Match a route pattern against a path, extracting parameters.
///
/// Pattern: "/forum/topic/:slug"
/// Path: "/forum/topic/welcome"
/// Result: Some({"slug": "welcome"})
fn match_pattern(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    let pattern_parts: Vec<&str> = pattern.trim_end_matches('/').split('/').collect();
    let path_parts: Vec<&str> = path.trim_end_matches('/').split('/').collect();

    if pattern_parts.len() != path_parts.len() {
        return None;
    }

    let mut params = HashMap::new();

    for (pat, actual) in pattern_parts.iter().zip(path_parts.iter()) {
        if let Some(param_name) = pat.strip_prefix(':') {
            if actual.is_empty() {
                return None;
            }
            params.insert(param_name.to_string(), actual.to_string());
        } else if !pat.eq_ignore_ascii_case(actual) {
            return None;
        }
    }

    Some(params)
}

/// The host's route table as seen by the forum.
pub trait RouteHost: Send + Sync {
    /// Replace all routes owned by `owner` in one step.
    fn replace_module_routes(&self, owner: &str, routes: Vec<ForumRoute>);
}

/// Process-wide route table shared between requests.
///
/// Concurrent rebuilds are last-write-wins; every rebuild is a full
/// replacement, so the table is always internally consistent.
#[derive(Debug, Clone, Default)]
pub struct SharedRouteTable {
    inner: Arc<RwLock<RouteTable>>,
}

impl SharedRouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current table.
    pub fn snapshot(&self) -> RouteTable {
        self.inner.read().clone()
    }

    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        self.inner.read().match_path(path)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl RouteHost for SharedRouteTable {
    fn replace_module_routes(&self, owner: &str, routes: Vec<ForumRoute>) {
        self.inner.write().replace_module(owner, routes);
    }
}
