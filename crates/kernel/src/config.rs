//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::settings::ForumOptions;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Path to the JSON content tree (default: ./content.json).
    pub content_fixture: PathBuf,

    /// Domain used when a request carries no Host header.
    pub site_domain: String,

    /// Content type alias of forum root nodes (default: colloquy).
    pub forum_root_alias: String,

    /// Member group assigned to new members when a forum names none.
    pub default_member_group: String,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let content_fixture = env::var("CONTENT_FIXTURE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./content.json"));

        let site_domain =
            env::var("SITE_DOMAIN").unwrap_or_else(|_| format!("http://localhost:{port}"));

        let forum_root_alias = non_empty_var("FORUM_ROOT_ALIAS")
            .unwrap_or_else(|| ForumOptions::DEFAULT_ROOT_ALIAS.to_string());

        let default_member_group = non_empty_var("DEFAULT_MEMBER_GROUP")
            .unwrap_or_else(|| ForumOptions::DEFAULT_MEMBER_GROUP.to_string());

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        Ok(Self {
            port,
            content_fixture,
            site_domain,
            forum_root_alias,
            default_member_group,
            cors_allowed_origins,
        })
    }

    /// Module options derived from this configuration.
    pub fn forum_options(&self) -> ForumOptions {
        let mut options = ForumOptions::with_root_alias(&self.forum_root_alias);
        options.default_member_group = self.default_member_group.clone();
        options
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
