//! Member records as seen by the forum.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Member property holding the denormalized email address.
pub const PROP_MEMBER_EMAIL: &str = "email";

/// Member property holding the URL slug.
pub const PROP_MEMBER_SLUG: &str = "slug";

/// Identifier of a member record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub i64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A member group (role) new members can be placed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberGroup {
    pub id: i64,
    pub name: String,
}

/// A member record owned by the host's member store.
///
/// `properties` mirrors the member type's schema: a key is present when the
/// schema defines the property, even if the value is still `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    /// Display name; the slug is derived from it.
    pub username: String,
    /// Canonical email address.
    pub email: String,
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

impl Member {
    /// Check whether the member's schema defines a property.
    pub fn has_property(&self, alias: &str) -> bool {
        self.properties.contains_key(alias)
    }

    /// Get a property as a string, treating null and empty strings as absent.
    pub fn property_str(&self, alias: &str) -> Option<&str> {
        self.properties
            .get(alias)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Set a string property.
    pub fn set_property(&mut self, alias: &str, value: impl Into<String>) {
        self.properties
            .insert(alias.to_string(), serde_json::Value::String(value.into()));
    }

    /// Current slug, if one has been assigned.
    pub fn slug(&self) -> Option<&str> {
        self.property_str(PROP_MEMBER_SLUG)
    }
}
