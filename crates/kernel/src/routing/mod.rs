//! Forum route table.
//!
//! Each forum root publishes virtual routes (topics, member profiles, forum
//! pages) under its URL. The routes are derived from the content tree and
//! rebuilt wholesale: once at startup, and at the end of any request in which
//! a forum root changed.

mod coordinator;
mod table;

pub use coordinator::{ROUTE_OWNER, RouteRebuildCoordinator};
pub use table::{ForumRoute, RouteHost, RouteKind, RouteMatch, RouteTable, SharedRouteTable};
