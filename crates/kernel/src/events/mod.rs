//! Content-change detection and host event wiring.
//!
//! The host publishes content cache refreshes (possibly relayed from other
//! nodes in a load-balanced deployment), member saves, member deletions, and
//! request completion through an [`EventRegistry`]. The forum registers typed
//! handlers there once at startup.

mod classifier;
mod notification;
mod registry;

pub use classifier::ChangeClassifier;
pub use notification::{ChangeNotification, ContentRef};
pub use registry::{
    ContentChangedHandler, EventRegistry, MemberDeletingHandler, MemberSavedHandler,
    RequestEndHandler,
};
