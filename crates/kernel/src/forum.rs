//! Forum module assembly and startup.

use std::sync::Arc;

use tracing::{error, info};

use crate::content::ContentStore;
use crate::events::{ChangeClassifier, EventRegistry};
use crate::members::{
    BadgeService, ForumDataStore, MemberGroupDirectory, MemberLifecycleHooks, MemberStore,
    UserNotifier,
};
use crate::routing::{RouteHost, RouteRebuildCoordinator};
use crate::settings::{ForumOptions, ForumSettingsService};

/// Host collaborators the forum module depends on.
#[derive(Clone)]
pub struct ForumServices {
    pub members: Arc<dyn MemberStore>,
    pub data: Arc<dyn ForumDataStore>,
    pub groups: Arc<dyn MemberGroupDirectory>,
    pub badges: Arc<dyn BadgeService>,
    pub notifier: Arc<dyn UserNotifier>,
    pub routes: Arc<dyn RouteHost>,
}

/// What happened during [`ForumModule::start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    /// Routes registered by the initial rebuild.
    pub routes: usize,
    /// Badge types synced, or `None` if the sync failed.
    pub badges: Option<usize>,
}

/// The forum's settings, change detection, routing, and member hooks.
pub struct ForumModule {
    settings: ForumSettingsService,
    classifier: Arc<ChangeClassifier>,
    routes: Arc<RouteRebuildCoordinator>,
    members: Arc<MemberLifecycleHooks>,
    data: Arc<dyn ForumDataStore>,
    badges: Arc<dyn BadgeService>,
}

impl ForumModule {
    pub fn new(options: ForumOptions, services: ForumServices) -> Self {
        let options = Arc::new(options);
        Self {
            settings: ForumSettingsService::new(Arc::clone(&options), services.groups),
            classifier: Arc::new(ChangeClassifier::new(Arc::clone(&options))),
            routes: Arc::new(RouteRebuildCoordinator::new(services.routes, options)),
            members: Arc::new(MemberLifecycleHooks::new(
                services.members,
                Arc::clone(&services.data),
                services.notifier,
            )),
            data: services.data,
            badges: services.badges,
        }
    }

    /// Application start.
    ///
    /// Must run once, before any request is served: builds the route table,
    /// registers the event handlers, and syncs badges. A badge sync failure is
    /// logged and does not prevent startup.
    pub async fn start(
        &self,
        content: &dyn ContentStore,
        registry: &mut EventRegistry,
    ) -> StartupReport {
        let routes = self.routes.rebuild_routes(content);
        self.register(registry);
        let badges = self.sync_badges().await;

        info!(routes, badges = ?badges, "forum module started");
        StartupReport { routes, badges }
    }

    /// Register the forum's handlers with the host.
    pub fn register(&self, registry: &mut EventRegistry) {
        registry.on_content_changed(self.classifier.clone());
        registry.on_request_end(self.routes.clone());
        registry.on_member_saved(self.members.clone());
        registry.on_member_deleting(self.members.clone());
    }

    /// Sync badge records inside one unit of work.
    ///
    /// Commits on success; on failure logs, rolls back, and returns `None`.
    pub async fn sync_badges(&self) -> Option<usize> {
        let uow = match self.data.begin().await {
            Ok(uow) => uow,
            Err(e) => {
                error!(error = %e, "failed to open unit of work for badge sync");
                return None;
            }
        };

        match self.badges.sync_badges().await {
            Ok(count) => match uow.commit().await {
                Ok(()) => Some(count),
                Err(e) => {
                    error!(error = %e, "failed to commit badge sync");
                    None
                }
            },
            Err(e) => {
                error!(error = %e, "error processing badge classes");
                uow.rollback().await;
                None
            }
        }
    }

    pub fn settings(&self) -> &ForumSettingsService {
        &self.settings
    }

    pub fn classifier(&self) -> &ChangeClassifier {
        &self.classifier
    }

    pub fn route_coordinator(&self) -> &RouteRebuildCoordinator {
        &self.routes
    }

    pub fn member_hooks(&self) -> &MemberLifecycleHooks {
        &self.members
    }
}
