//! Read-only content store seam.

use std::collections::VecDeque;
use std::sync::Arc;

use super::{ContentNode, NodeId};

/// Read-only view of the host's published content cache.
///
/// Implementors provide the three primitive lookups; the typed traversals are
/// derived from them but may be overridden when the backing store can answer
/// them more cheaply (e.g. an indexed XPath-style query).
///
/// All alias comparisons are case-insensitive.
pub trait ContentStore: Send + Sync {
    /// Get a node by ID.
    fn node(&self, id: NodeId) -> Option<Arc<ContentNode>>;

    /// Get the direct children of a node, in document order.
    fn children(&self, id: NodeId) -> Vec<Arc<ContentNode>>;

    /// Get the tree roots, in document order.
    fn roots(&self) -> Vec<Arc<ContentNode>>;

    /// Walk upward from `node` (inclusive) to the nearest node of type `alias`.
    fn ancestor_or_self_of_type(
        &self,
        node: &ContentNode,
        alias: &str,
    ) -> Option<Arc<ContentNode>> {
        if node.is_of_type(alias) {
            return self.node(node.id);
        }
        self.ancestor_of_type(node, alias)
    }

    /// Walk upward from the parent of `node` to the nearest node of type `alias`.
    fn ancestor_of_type(&self, node: &ContentNode, alias: &str) -> Option<Arc<ContentNode>> {
        let mut next = node.parent_id;
        // Guard against parent cycles in a corrupt snapshot.
        let mut hops = 0usize;
        while let Some(id) = next {
            let current = self.node(id)?;
            if current.is_of_type(alias) {
                return Some(current);
            }
            next = current.parent_id;
            hops += 1;
            if hops > 10_000 {
                tracing::warn!(node = %node.id, "parent chain too deep, giving up");
                return None;
            }
        }
        None
    }

    /// Nearest strict descendant of type `alias` (breadth-first, document order).
    fn descendant_of_type(&self, node: &ContentNode, alias: &str) -> Option<Arc<ContentNode>> {
        let mut queue: VecDeque<Arc<ContentNode>> = self.children(node.id).into();
        while let Some(current) = queue.pop_front() {
            if current.is_of_type(alias) {
                return Some(current);
            }
            queue.extend(self.children(current.id));
        }
        None
    }

    /// Like [`descendant_of_type`](Self::descendant_of_type) but includes `node` itself.
    fn descendant_or_self_of_type(
        &self,
        node: &ContentNode,
        alias: &str,
    ) -> Option<Arc<ContentNode>> {
        if node.is_of_type(alias) {
            return self.node(node.id);
        }
        self.descendant_of_type(node, alias)
    }

    /// Every node of type `alias`, in document order (depth-first pre-order).
    fn nodes_of_type(&self, alias: &str) -> Vec<Arc<ContentNode>> {
        let mut found = Vec::new();
        let mut stack: Vec<Arc<ContentNode>> = self.roots();
        stack.reverse();
        while let Some(current) = stack.pop() {
            let mut children = self.children(current.id);
            children.reverse();
            if current.is_of_type(alias) {
                found.push(current);
            }
            stack.extend(children);
        }
        found
    }

    /// Find the node published at `url`.
    ///
    /// Trailing slashes are ignored on both sides.
    fn node_by_url(&self, url: &str) -> Option<Arc<ContentNode>> {
        let wanted = url.trim_end_matches('/');
        let mut stack = self.roots();
        while let Some(current) = stack.pop() {
            if current.url.trim_end_matches('/') == wanted {
                return Some(current);
            }
            stack.extend(self.children(current.id));
        }
        None
    }
}
