//! Request-memoized settings lookup.

use std::sync::Arc;

use tracing::debug;

use super::{ForumOptions, ForumSettings, SettingsResolver};
use crate::content::{ContentNode, ContentStore, NodeId};
use crate::members::MemberGroupDirectory;
use crate::request::{CacheKey, RequestContext};

/// Request cache key for the resolved forum settings.
///
/// Both lookups share this key, so at most one forum configuration is
/// resolved per request no matter how it was located.
pub struct ForumSettingsKey;

impl CacheKey for ForumSettingsKey {
    type Value = Option<Arc<ForumSettings>>;
}

/// Locates the forum root for a request and resolves its settings once.
pub struct ForumSettingsService {
    options: Arc<ForumOptions>,
    groups: Arc<dyn MemberGroupDirectory>,
}

impl ForumSettingsService {
    pub fn new(options: Arc<ForumOptions>, groups: Arc<dyn MemberGroupDirectory>) -> Self {
        Self { options, groups }
    }

    pub fn options(&self) -> &ForumOptions {
        &self.options
    }

    /// Settings of the forum containing node `id`.
    ///
    /// Walks up from the node (inclusive) to the nearest forum root.
    pub fn for_node(&self, ctx: &RequestContext, id: NodeId) -> Option<Arc<ForumSettings>> {
        ctx.cache().get_or_compute::<ForumSettingsKey, _>(|| {
            let content = ctx.content()?;
            let Some(node) = content.node(id) else {
                debug!(node = %id, "settings requested for unknown node");
                return None;
            };
            let root = content.ancestor_or_self_of_type(&node, &self.options.doc_types.forum_root);
            self.resolve(ctx, &**content, root.as_deref())
        })
    }

    /// Settings of the forum the current request belongs to.
    ///
    /// Looks above the current page first; when the page sits above the forum
    /// in the tree, falls back to the nearest forum root below it.
    pub fn for_current_request(&self, ctx: &RequestContext) -> Option<Arc<ForumSettings>> {
        ctx.cache().get_or_compute::<ForumSettingsKey, _>(|| {
            let content = ctx.content()?;
            let current = ctx.current_node()?;
            let alias = &self.options.doc_types.forum_root;
            let root = content
                .ancestor_or_self_of_type(&current, alias)
                .or_else(|| content.descendant_of_type(&current, alias));
            self.resolve(ctx, &**content, root.as_deref())
        })
    }

    fn resolve(
        &self,
        ctx: &RequestContext,
        content: &dyn ContentStore,
        root: Option<&ContentNode>,
    ) -> Option<Arc<ForumSettings>> {
        let resolver = SettingsResolver::new(content, &*self.groups, &self.options, ctx.domain());
        let settings = resolver.resolve(root).map(Arc::new);
        if settings.is_none() {
            debug!("no forum root found for request");
        }
        settings
    }
}
