//! HTTP middleware components.

pub mod request_scope;

pub use request_scope::request_scope;
