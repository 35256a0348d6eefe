//! Member lifecycle integrity.
//!
//! The member and forum-data stores belong to the host; this module reaches
//! them through the store traits and keeps two invariants:
//! every member carries a unique slug, and a member is never deleted while
//! the forum data it owns cannot be removed with it.

mod hooks;
mod memory;
mod model;
pub mod slug;
mod store;

pub use hooks::{DeleteDecision, MemberLifecycleHooks, SaveReport};
pub use memory::{LogNotifier, MemoryMemberStore};
pub use model::{Member, MemberGroup, MemberId, PROP_MEMBER_EMAIL, PROP_MEMBER_SLUG};
pub use store::{
    BadgeService, CascadeOutcome, ForumDataStore, MemberGroupDirectory, MemberStore,
    NotificationLevel, UnitOfWork, UserNotifier,
};
