//! Host event registry.
//!
//! Handlers are registered once at startup and invoked in registration
//! order. Handlers absorb their own faults; dispatch never fails.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{ChangeClassifier, ChangeNotification};
use crate::members::{DeleteDecision, Member, MemberLifecycleHooks};
use crate::request::RequestContext;
use crate::routing::RouteRebuildCoordinator;

/// Reacts to content cache refreshes and removals.
pub trait ContentChangedHandler: Send + Sync {
    fn on_content_changed(&self, ctx: Option<&RequestContext>, notification: &ChangeNotification);
}

/// Runs after the request handler has produced its response.
pub trait RequestEndHandler: Send + Sync {
    fn on_request_end(&self, ctx: &RequestContext);
}

/// Runs after a batch of members was saved.
#[async_trait]
pub trait MemberSavedHandler: Send + Sync {
    async fn on_members_saved(&self, members: &mut [Member]);
}

/// Runs before a batch of members is deleted and may veto the delete.
#[async_trait]
pub trait MemberDeletingHandler: Send + Sync {
    async fn on_members_deleting(&self, members: &[Member]) -> DeleteDecision;
}

/// Registry of typed event handlers exposed by the host.
#[derive(Default)]
pub struct EventRegistry {
    content_changed: Vec<Arc<dyn ContentChangedHandler>>,
    request_end: Vec<Arc<dyn RequestEndHandler>>,
    member_saved: Vec<Arc<dyn MemberSavedHandler>>,
    member_deleting: Vec<Arc<dyn MemberDeletingHandler>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_content_changed(&mut self, handler: Arc<dyn ContentChangedHandler>) {
        self.content_changed.push(handler);
    }

    pub fn on_request_end(&mut self, handler: Arc<dyn RequestEndHandler>) {
        self.request_end.push(handler);
    }

    pub fn on_member_saved(&mut self, handler: Arc<dyn MemberSavedHandler>) {
        self.member_saved.push(handler);
    }

    pub fn on_member_deleting(&mut self, handler: Arc<dyn MemberDeletingHandler>) {
        self.member_deleting.push(handler);
    }

    /// Publish a content change to every handler.
    pub fn content_changed(&self, ctx: Option<&RequestContext>, notification: &ChangeNotification) {
        for handler in &self.content_changed {
            handler.on_content_changed(ctx, notification);
        }
    }

    /// Signal the end of a request.
    pub fn request_ended(&self, ctx: &RequestContext) {
        for handler in &self.request_end {
            handler.on_request_end(ctx);
        }
    }

    /// Publish a saved batch of members.
    pub async fn members_saved(&self, members: &mut [Member]) {
        for handler in &self.member_saved {
            handler.on_members_saved(members).await;
        }
    }

    /// Ask every handler whether the batch may be deleted.
    ///
    /// Stops at the first handler that cancels.
    pub async fn members_deleting(&self, members: &[Member]) -> DeleteDecision {
        for handler in &self.member_deleting {
            let decision = handler.on_members_deleting(members).await;
            if decision.is_cancelled() {
                debug!(members = members.len(), "member delete cancelled by handler");
                return decision;
            }
        }
        DeleteDecision::Proceed
    }

    /// Number of registered handlers across all events.
    pub fn handler_count(&self) -> usize {
        self.content_changed.len()
            + self.request_end.len()
            + self.member_saved.len()
            + self.member_deleting.len()
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("content_changed", &self.content_changed.len())
            .field("request_end", &self.request_end.len())
            .field("member_saved", &self.member_saved.len())
            .field("member_deleting", &self.member_deleting.len())
            .finish()
    }
}

impl ContentChangedHandler for ChangeClassifier {
    fn on_content_changed(&self, ctx: Option<&RequestContext>, notification: &ChangeNotification) {
        self.on_change_notification(ctx, notification);
    }
}

impl RequestEndHandler for RouteRebuildCoordinator {
    fn on_request_end(&self, ctx: &RequestContext) {
        self.end_request(ctx);
    }
}

#[async_trait]
impl MemberSavedHandler for MemberLifecycleHooks {
    async fn on_members_saved(&self, members: &mut [Member]) {
        self.on_saved(members).await;
    }
}

#[async_trait]
impl MemberDeletingHandler for MemberLifecycleHooks {
    async fn on_members_deleting(&self, members: &[Member]) -> DeleteDecision {
        self.on_deleting(members).await
    }
}
