//! In-memory member store.
//!
//! Backs the `colloquy` binary and the integration tests. Forum data is kept
//! as a per-member record count; deletions are staged in the unit of work and
//! only applied on commit.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

use super::slug::is_suffixed;
use super::{
    BadgeService, CascadeOutcome, ForumDataStore, Member, MemberGroup, MemberGroupDirectory,
    MemberId, MemberStore, NotificationLevel, UnitOfWork, UserNotifier,
};

#[derive(Debug, Default)]
struct State {
    members: BTreeMap<MemberId, Member>,
    /// Number of forum records (topics, posts, votes) owned by each member.
    forum_data: HashMap<MemberId, usize>,
    /// Members whose data may not be removed.
    protected: HashSet<MemberId>,
    groups: Vec<MemberGroup>,
    badge_types: usize,
    /// Every save as `(member, raise_events)`.
    saves: Vec<(MemberId, bool)>,
}

/// Member, group, and forum-data store held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryMemberStore {
    state: Arc<Mutex<State>>,
}

impl MemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a member group.
    pub fn add_group(&self, name: &str) -> MemberGroup {
        let mut state = self.state.lock();
        let group = MemberGroup {
            id: state.groups.len() as i64 + 1,
            name: name.to_string(),
        };
        state.groups.push(group.clone());
        group
    }

    /// Insert a member without going through the save path.
    pub fn insert(&self, member: Member) {
        self.state.lock().members.insert(member.id, member);
    }

    /// Get a stored member.
    pub fn member(&self, id: MemberId) -> Option<Member> {
        self.state.lock().members.get(&id).cloned()
    }

    /// Remove a member record.
    pub fn remove(&self, id: MemberId) -> Option<Member> {
        self.state.lock().members.remove(&id)
    }

    /// Set how many forum records a member owns.
    pub fn set_forum_data(&self, id: MemberId, records: usize) {
        self.state.lock().forum_data.insert(id, records);
    }

    /// Number of forum records a member owns.
    pub fn forum_data(&self, id: MemberId) -> usize {
        self.state.lock().forum_data.get(&id).copied().unwrap_or(0)
    }

    /// Mark a member's data as undeletable.
    pub fn protect(&self, id: MemberId) {
        self.state.lock().protected.insert(id);
    }

    /// Set the number of badge types reported by a sync.
    pub fn set_badge_types(&self, count: usize) {
        self.state.lock().badge_types = count;
    }

    /// Saves performed so far, as `(member, raise_events)`.
    pub fn saves(&self) -> Vec<(MemberId, bool)> {
        self.state.lock().saves.clone()
    }
}

#[async_trait]
impl MemberStore for MemoryMemberStore {
    async fn members_with_slug(&self, slug: &str) -> Result<Vec<(MemberId, String)>> {
        let state = self.state.lock();
        Ok(state
            .members
            .values()
            .filter_map(|m| {
                let stored = m.slug()?;
                (stored == slug || is_suffixed(stored, slug)).then(|| (m.id, stored.to_string()))
            })
            .collect())
    }

    async fn save(&self, member: &Member, raise_events: bool) -> Result<()> {
        let mut state = self.state.lock();
        state.members.insert(member.id, member.clone());
        state.saves.push((member.id, raise_events));
        Ok(())
    }
}

#[async_trait]
impl ForumDataStore for MemoryMemberStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        Ok(Box::new(MemoryUnitOfWork {
            state: Arc::clone(&self.state),
            staged: Vec::new(),
        }))
    }
}

#[async_trait]
impl BadgeService for MemoryMemberStore {
    async fn sync_badges(&self) -> Result<usize> {
        Ok(self.state.lock().badge_types)
    }
}

impl MemberGroupDirectory for MemoryMemberStore {
    fn group_by_name(&self, name: &str) -> Option<MemberGroup> {
        self.state
            .lock()
            .groups
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
            .cloned()
    }
}

struct MemoryUnitOfWork {
    state: Arc<Mutex<State>>,
    staged: Vec<MemberId>,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn delete_member_data(&mut self, member: MemberId) -> Result<CascadeOutcome> {
        if self.state.lock().protected.contains(&member) {
            return Ok(CascadeOutcome::Blocked {
                reason: format!("forum data for member {member} is protected"),
            });
        }
        self.staged.push(member);
        Ok(CascadeOutcome::Deleted)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut state = self.state.lock();
        for member in &self.staged {
            state.forum_data.remove(member);
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) {
        tracing::debug!(staged = self.staged.len(), "unit of work rolled back");
    }
}

/// Notifier that writes user-facing messages to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl UserNotifier for LogNotifier {
    fn notify(&self, level: NotificationLevel, title: &str, message: &str) {
        match level {
            NotificationLevel::Info => tracing::info!(title, message, "user notification"),
            NotificationLevel::Warning => tracing::warn!(title, message, "user notification"),
            NotificationLevel::Error => tracing::error!(title, message, "user notification"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn member(id: i64, slug: Option<&str>) -> Member {
        let mut m = Member {
            id: MemberId(id),
            username: format!("user {id}"),
            email: format!("user{id}@example.com"),
            properties: HashMap::new(),
        };
        if let Some(slug) = slug {
            m.set_property(crate::members::PROP_MEMBER_SLUG, slug);
        }
        m
    }

    #[tokio::test]
    async fn members_with_slug_matches_suffixes_only() {
        let store = MemoryMemberStore::new();
        store.insert(member(1, Some("ada")));
        store.insert(member(2, Some("ada-1")));
        store.insert(member(3, Some("ada-lovelace")));
        store.insert(member(4, None));

        let mut found = store.members_with_slug("ada").await.unwrap();
        found.sort();
        assert_eq!(
            found,
            vec![(MemberId(1), "ada".to_string()), (MemberId(2), "ada-1".to_string())]
        );
    }

    #[tokio::test]
    async fn rollback_keeps_forum_data() {
        let store = MemoryMemberStore::new();
        store.set_forum_data(MemberId(1), 5);

        let mut uow = store.begin().await.unwrap();
        assert_eq!(
            uow.delete_member_data(MemberId(1)).await.unwrap(),
            CascadeOutcome::Deleted
        );
        uow.rollback().await;
        assert_eq!(store.forum_data(MemberId(1)), 5);

        let mut uow = store.begin().await.unwrap();
        uow.delete_member_data(MemberId(1)).await.unwrap();
        uow.commit().await.unwrap();
        assert_eq!(store.forum_data(MemberId(1)), 0);
    }

    #[tokio::test]
    async fn protected_member_blocks_cascade() {
        let store = MemoryMemberStore::new();
        store.protect(MemberId(2));
        let mut uow = store.begin().await.unwrap();
        let outcome = uow.delete_member_data(MemberId(2)).await.unwrap();
        assert!(matches!(outcome, CascadeOutcome::Blocked { .. }));
    }

    #[test]
    fn group_lookup_ignores_case() {
        let store = MemoryMemberStore::new();
        let group = store.add_group("Colloquy Standard");
        assert_eq!(store.group_by_name("colloquy standard"), Some(group));
        assert!(store.group_by_name("Moderators").is_none());
    }
}
