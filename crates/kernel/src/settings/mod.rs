//! Forum configuration resolution.
//!
//! A forum instance is configured by the properties of its root content node
//! and by the special pages placed around it. [`SettingsResolver`] turns a
//! root node into an immutable [`ForumSettings`] snapshot; the
//! [`ForumSettingsService`] locates the root for a request and memoizes the
//! snapshot in the request's cache.

mod model;
mod options;
mod resolver;
pub mod schema;
mod service;

pub use model::{ForumSettings, ResolutionWarning, WarningKind};
pub use options::{DocTypes, ForumOptions};
pub use resolver::SettingsResolver;
pub use schema::{PropertyKind, property_aliases};
pub use service::{ForumSettingsKey, ForumSettingsService};
