//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::content::{ContentStore, ContentTree};
use crate::events::EventRegistry;
use crate::forum::{ForumModule, ForumServices, StartupReport};
use crate::members::{LogNotifier, MemoryMemberStore};
use crate::routing::SharedRouteTable;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,

    /// Published content tree.
    content: Arc<dyn ContentStore>,

    /// Host route table the forum registers its routes in.
    routes: SharedRouteTable,

    /// Event handlers registered at startup. Read-only afterwards.
    registry: EventRegistry,

    forum: ForumModule,

    /// Member records, forum data, and badge types.
    members: MemoryMemberStore,

    startup: StartupReport,
}

impl AppState {
    /// Load the content tree named by the config and start the forum module.
    pub async fn new(config: &Config) -> Result<Self> {
        let tree = ContentTree::load(&config.content_fixture).with_context(|| {
            format!(
                "failed to load content tree from {}",
                config.content_fixture.display()
            )
        })?;

        let members = MemoryMemberStore::new();
        members.add_group(&config.default_member_group);

        Ok(Self::with_content(config, Arc::new(tree), members).await)
    }

    /// Build state around an existing content store and member store.
    pub async fn with_content(
        config: &Config,
        content: Arc<dyn ContentStore>,
        members: MemoryMemberStore,
    ) -> Self {
        let routes = SharedRouteTable::new();
        let store = Arc::new(members.clone());
        let forum = ForumModule::new(
            config.forum_options(),
            ForumServices {
                members: store.clone(),
                data: store.clone(),
                groups: store.clone(),
                badges: store,
                notifier: Arc::new(LogNotifier),
                routes: Arc::new(routes.clone()),
            },
        );

        let mut registry = EventRegistry::new();
        let startup = forum.start(content.as_ref(), &mut registry).await;
        info!(handlers = registry.handler_count(), "event handlers registered");

        Self {
            inner: Arc::new(AppStateInner {
                config: config.clone(),
                content,
                routes,
                registry,
                forum,
                members,
                startup,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn content(&self) -> &Arc<dyn ContentStore> {
        &self.inner.content
    }

    pub fn routes(&self) -> &SharedRouteTable {
        &self.inner.routes
    }

    pub fn registry(&self) -> &EventRegistry {
        &self.inner.registry
    }

    pub fn forum(&self) -> &ForumModule {
        &self.inner.forum
    }

    pub fn members(&self) -> &MemoryMemberStore {
        &self.inner.members
    }

    pub fn startup(&self) -> &StartupReport {
        &self.inner.startup
    }
}
