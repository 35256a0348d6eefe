//! Colloquy Forum Kernel Library
//!
//! Forum settings resolution, route coordination, and member lifecycle hooks
//! for a content-managed site. The `colloquy` binary serves them over HTTP.

pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod forum;
pub mod members;
pub mod middleware;
pub mod request;
pub mod routes;
pub mod routing;
pub mod settings;
pub mod state;

pub use config::Config;
pub use forum::{ForumModule, ForumServices, StartupReport};
pub use state::AppState;
