//! In-memory content snapshot.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use super::{ContentNode, ContentStore, NodeId};

/// Immutable published-content snapshot.
///
/// Nodes keep the order they were supplied in, which is taken as document
/// order for sibling traversal.
#[derive(Debug, Default)]
pub struct ContentTree {
    nodes: HashMap<NodeId, Arc<ContentNode>>,
    children: HashMap<NodeId, Vec<NodeId>>,
    roots: Vec<NodeId>,
}

impl ContentTree {
    /// Build a tree from nodes listed parents-before-children.
    pub fn from_nodes(nodes: Vec<ContentNode>) -> Result<Self> {
        let mut tree = Self::default();

        for node in nodes {
            if tree.nodes.contains_key(&node.id) {
                bail!("duplicate content node id {}", node.id);
            }
            match node.parent_id {
                Some(parent) if !tree.nodes.contains_key(&parent) => {
                    bail!(
                        "content node {} references unknown parent {parent}",
                        node.id
                    );
                }
                Some(parent) => tree.children.entry(parent).or_default().push(node.id),
                None => tree.roots.push(node.id),
            }
            tree.nodes.insert(node.id, Arc::new(node));
        }

        Ok(tree)
    }

    /// Parse a tree from a JSON array of nodes.
    pub fn from_json(json: &str) -> Result<Self> {
        let nodes: Vec<ContentNode> =
            serde_json::from_str(json).context("failed to parse content nodes")?;
        Self::from_nodes(nodes)
    }

    /// Load a tree from a JSON fixture file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read content fixture {}", path.display()))?;
        let tree = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), nodes = tree.len(), "content tree loaded");
        Ok(tree)
    }

    /// Number of nodes in the snapshot.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn resolve(&self, ids: &[NodeId]) -> Vec<Arc<ContentNode>> {
        ids.iter()
            .filter_map(|id| self.nodes.get(id).cloned())
            .collect()
    }
}

impl ContentStore for ContentTree {
    fn node(&self, id: NodeId) -> Option<Arc<ContentNode>> {
        self.nodes.get(&id).cloned()
    }

    fn children(&self, id: NodeId) -> Vec<Arc<ContentNode>> {
        self.children
            .get(&id)
            .map(|ids| self.resolve(ids))
            .unwrap_or_default()
    }

    fn roots(&self) -> Vec<Arc<ContentNode>> {
        self.resolve(&self.roots)
    }
}
