//! Decides whether a content change touches forum routes.

use std::sync::Arc;

use tracing::debug;

use super::ChangeNotification;
use crate::request::RequestContext;
use crate::settings::ForumOptions;

/// Flags the current request for a route rebuild when a forum root changes.
pub struct ChangeClassifier {
    options: Arc<ForumOptions>,
}

impl ChangeClassifier {
    pub fn new(options: Arc<ForumOptions>) -> Self {
        Self { options }
    }

    /// Inspect a notification and mark the request if it concerns a forum root.
    ///
    /// Notifications can arrive on a broadcast path shared with unrelated
    /// subsystems and outside any request; with no request scope or no content
    /// cache this is a no-op. Never fails. Returns whether the flag was set.
    pub fn on_change_notification(
        &self,
        ctx: Option<&RequestContext>,
        notification: &ChangeNotification,
    ) -> bool {
        let Some(ctx) = ctx else {
            debug!(node = %notification.node_id(), "change notification outside a request, ignoring");
            return false;
        };
        let Some(cache) = ctx.content() else {
            debug!(node = %notification.node_id(), "no content cache for change notification, ignoring");
            return false;
        };

        let root_alias = &self.options.doc_types.forum_root;
        let relevant = match notification {
            ChangeNotification::RefreshById { id } | ChangeNotification::RemoveById { id } => {
                cache.node(*id).is_some_and(|node| node.is_of_type(root_alias))
            }
            ChangeNotification::RefreshByInstance { content }
            | ChangeNotification::RemoveByInstance { content } => {
                content.content_type_alias.eq_ignore_ascii_case(root_alias)
            }
        };

        if relevant {
            debug!(node = %notification.node_id(), "forum root changed, routes will be rebuilt");
            ctx.mark_routes_dirty();
        }
        relevant
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::content::{ContentTree, NodeId};
    use crate::events::ContentRef;

    const TREE: &str = r#"[
        {"id": 7, "content_type_alias": "Colloquy", "name": "Forum", "url": "/forum/", "update_date": "2026-01-01T00:00:00Z"},
        {"id": 8, "parent_id": 7, "content_type_alias": "colloquyLogin", "name": "Login", "url": "/forum/login/", "update_date": "2026-01-01T00:00:00Z"}
    ]"#;

    fn classifier() -> ChangeClassifier {
        ChangeClassifier::new(Arc::new(ForumOptions::default()))
    }

    fn context() -> RequestContext {
        RequestContext::new(Arc::new(ContentTree::from_json(TREE).unwrap()), "")
    }

    #[test]
    fn refresh_of_forum_root_sets_flag() {
        let ctx = context();
        assert!(classifier().on_change_notification(
            Some(&ctx),
            &ChangeNotification::RefreshById { id: NodeId(7) }
        ));
        assert!(ctx.routes_dirty());
    }

    #[test]
    fn other_types_leave_flag_clear() {
        let ctx = context();
        let classifier = classifier();
        assert!(!classifier.on_change_notification(
            Some(&ctx),
            &ChangeNotification::RemoveById { id: NodeId(8) }
        ));
        assert!(!classifier.on_change_notification(
            Some(&ctx),
            &ChangeNotification::RefreshById { id: NodeId(404) }
        ));
        assert!(!classifier.on_change_notification(
            Some(&ctx),
            &ChangeNotification::RefreshByInstance {
                content: ContentRef {
                    id: NodeId(8),
                    content_type_alias: "colloquyLogin".to_string(),
                },
            }
        ));
        assert!(!ctx.routes_dirty());
    }

    #[test]
    fn instance_alias_is_case_insensitive() {
        let ctx = context();
        assert!(classifier().on_change_notification(
            Some(&ctx),
            &ChangeNotification::RemoveByInstance {
                content: ContentRef {
                    id: NodeId(99),
                    content_type_alias: "COLLOQUY".to_string(),
                },
            }
        ));
        assert!(ctx.routes_dirty());
    }

    #[test]
    fn no_request_scope_is_noop() {
        let classifier = classifier();
        let n = ChangeNotification::RefreshById { id: NodeId(7) };
        assert!(!classifier.on_change_notification(None, &n));

        let detached = RequestContext::detached();
        assert!(!classifier.on_change_notification(Some(&detached), &n));
        assert!(!detached.routes_dirty());
    }
}
