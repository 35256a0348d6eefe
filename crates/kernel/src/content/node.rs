//! Content node model.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a node in the content tree.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A published content node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    pub id: NodeId,
    /// Parent node (None for tree roots).
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    /// Document type alias, e.g. "colloquy" or "colloquyLogin".
    pub content_type_alias: String,
    pub name: String,
    /// Site-relative URL of the node.
    pub url: String,
    pub update_date: DateTime<Utc>,
    /// Raw property values keyed by property alias.
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

impl ContentNode {
    /// Check the document type alias, ignoring ASCII case.
    pub fn is_of_type(&self, alias: &str) -> bool {
        self.content_type_alias.eq_ignore_ascii_case(alias)
    }

    /// Get a raw property value.
    ///
    /// JSON `null` is treated the same as an absent property.
    pub fn property(&self, alias: &str) -> Option<&serde_json::Value> {
        self.properties.get(alias).filter(|v| !v.is_null())
    }

    /// Get a property as a string slice, if it is a non-empty string.
    pub fn property_str(&self, alias: &str) -> Option<&str> {
        self.property(alias)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn node(alias: &str) -> ContentNode {
        ContentNode {
            id: NodeId(1),
            parent_id: None,
            content_type_alias: alias.to_string(),
            name: "Forum".to_string(),
            url: "/forum/".to_string(),
            update_date: Utc::now(),
            properties: HashMap::from([
                ("forumName".to_string(), serde_json::json!("Town Square")),
                ("theme".to_string(), serde_json::Value::Null),
                ("blank".to_string(), serde_json::json!("")),
            ]),
        }
    }

    #[test]
    fn type_alias_is_case_insensitive() {
        let n = node("Colloquy");
        assert!(n.is_of_type("colloquy"));
        assert!(n.is_of_type("COLLOQUY"));
        assert!(!n.is_of_type("colloquyLogin"));
    }

    #[test]
    fn null_property_is_absent() {
        let n = node("colloquy");
        assert!(n.property("theme").is_none());
        assert!(n.property("missing").is_none());
        assert_eq!(n.property_str("forumName"), Some("Town Square"));
        assert_eq!(n.property_str("blank"), None);
    }

    #[test]
    fn node_id_deserializes_from_integer() {
        let id: NodeId = serde_json::from_str("7").unwrap();
        assert_eq!(id, NodeId(7));
        assert_eq!(id.to_string(), "7");
    }
}
