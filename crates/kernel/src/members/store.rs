//! Host-side member seams.

use anyhow::Result;
use async_trait::async_trait;

use super::{Member, MemberGroup, MemberId};

/// Persistence for member records.
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Members whose slug is `slug` or `slug` plus a `-N` suffix.
    ///
    /// Returns `(member, stored slug)` pairs.
    async fn members_with_slug(&self, slug: &str) -> Result<Vec<(MemberId, String)>>;

    /// Persist a member.
    ///
    /// With `raise_events = false` the store must not emit save notifications
    /// or invalidate downstream caches for this write.
    async fn save(&self, member: &Member, raise_events: bool) -> Result<()>;
}

/// Result of attempting to remove a member's dependent forum data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeOutcome {
    /// All dependent data was staged for deletion.
    Deleted,
    /// Some dependent data cannot be removed; the member must stay.
    Blocked { reason: String },
}

/// A transactional scope over the forum's own data.
///
/// Dropping a unit of work without committing discards its changes.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Stage deletion of every forum record owned by `member`.
    async fn delete_member_data(&mut self, member: MemberId) -> Result<CascadeOutcome>;

    /// Make staged changes durable.
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Discard staged changes.
    async fn rollback(self: Box<Self>);
}

/// Factory for units of work over the forum's data.
#[async_trait]
pub trait ForumDataStore: Send + Sync {
    /// Open a new unit of work.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>>;
}

/// Reconciles badge definitions with stored badge records at startup.
#[async_trait]
pub trait BadgeService: Send + Sync {
    /// Sync badge records, returning how many badge types are registered.
    async fn sync_badges(&self) -> Result<usize>;
}

/// Lookup of member groups by name.
///
/// Served from the host's group cache, so lookups are synchronous.
pub trait MemberGroupDirectory: Send + Sync {
    fn group_by_name(&self, name: &str) -> Option<MemberGroup>;
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Delivers short messages to the user who triggered an operation.
pub trait UserNotifier: Send + Sync {
    fn notify(&self, level: NotificationLevel, title: &str, message: &str);
}
