//! Content cache change notifications.

use serde::{Deserialize, Serialize};

use crate::content::NodeId;

/// A content item carried by an instance notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRef {
    pub id: NodeId,
    pub content_type_alias: String,
}

/// A refresh or removal broadcast by the content cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeNotification {
    RefreshById { id: NodeId },
    RemoveById { id: NodeId },
    RefreshByInstance { content: ContentRef },
    RemoveByInstance { content: ContentRef },
}

impl ChangeNotification {
    /// ID of the node the notification concerns.
    pub fn node_id(&self) -> NodeId {
        match self {
            Self::RefreshById { id } | Self::RemoveById { id } => *id,
            Self::RefreshByInstance { content } | Self::RemoveByInstance { content } => content.id,
        }
    }
}
