//! Content tree access.
//!
//! The forum kernel never owns content. It reads a published snapshot of the
//! host's hierarchical content tree through [`ContentStore`], and ships an
//! in-memory [`ContentTree`] snapshot for the binary and tests.

mod node;
mod store;
mod tree;

pub use node::{ContentNode, NodeId};
pub use store::ContentStore;
pub use tree::ContentTree;
