//! Per-request state.
//!
//! A [`RequestContext`] is created by the hosting pipeline for every inbound
//! request and threaded explicitly through the forum services. It owns the
//! request-scoped memo cache and the deferred route-rebuild flag.

mod cache;
mod context;

pub use cache::{CacheKey, RequestCache};
pub use context::RequestContext;
