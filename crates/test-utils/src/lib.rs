//! Colloquy test utilities.
//!
//! Helpers for integration testing: content tree fixtures, member builders,
//! and assertion utilities for JSON responses.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value as JsonValue, json};

use colloquy_kernel::content::{ContentNode, ContentTree, NodeId};
use colloquy_kernel::members::{Member, MemberId, PROP_MEMBER_EMAIL, PROP_MEMBER_SLUG};

/// Site home page of [`forum_tree`].
pub const HOME_ID: NodeId = NodeId(1);

/// Fully configured forum root of [`forum_tree`], at `/forum/`.
pub const FORUM_ID: NodeId = NodeId(2);

/// Login page below [`FORUM_ID`].
pub const LOGIN_ID: NodeId = NodeId(3);

/// Category page below [`FORUM_ID`].
pub const CATEGORY_ID: NodeId = NodeId(5);

/// Plain page outside any forum.
pub const ABOUT_ID: NodeId = NodeId(6);

/// Sparsely configured forum root of [`forum_tree`], at `/support/`.
pub const SUPPORT_ID: NodeId = NodeId(7);

/// Member group named by the forum at [`FORUM_ID`].
pub const STARTING_GROUP: &str = "Regulars";

/// Timestamp every fixture node is stamped with unless overridden.
pub fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
}

/// Create a test content node with default values.
pub fn test_node(id: i64, content_type_alias: &str, url: &str) -> TestNode {
    TestNode {
        id: NodeId(id),
        parent_id: None,
        content_type_alias: content_type_alias.to_string(),
        name: format!("Node {id}"),
        url: url.to_string(),
        update_date: fixture_time(),
        properties: HashMap::new(),
    }
}

/// A content node builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestNode {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    pub content_type_alias: String,
    pub name: String,
    pub url: String,
    pub update_date: DateTime<Utc>,
    pub properties: HashMap<String, JsonValue>,
}

impl TestNode {
    /// Place the node below `parent`.
    pub fn under(mut self, parent: i64) -> Self {
        self.parent_id = Some(NodeId(parent));
        self
    }

    /// Set the display name.
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the last update time.
    pub fn updated(mut self, at: DateTime<Utc>) -> Self {
        self.update_date = at;
        self
    }

    /// Add a single property.
    pub fn with_property(mut self, alias: &str, value: JsonValue) -> Self {
        self.properties.insert(alias.to_string(), value);
        self
    }

    /// Add every entry of a JSON object as a property.
    pub fn with_properties(mut self, properties: JsonValue) -> Self {
        if let JsonValue::Object(map) = properties {
            self.properties.extend(map);
        }
        self
    }

    pub fn build(self) -> ContentNode {
        ContentNode {
            id: self.id,
            parent_id: self.parent_id,
            content_type_alias: self.content_type_alias,
            name: self.name,
            url: self.url,
            update_date: self.update_date,
            properties: self.properties,
        }
    }
}

/// Properties of a fully configured forum root.
pub fn forum_properties() -> JsonValue {
    json!({
        "forumName": "Town Square",
        "forumDescription": "Talk about anything",
        "topicUrlName": "discussion",
        "memberUrlName": "people",
        "forumUrlName": "",
        "closeForum": false,
        "allowRssFeeds": true,
        "suspendRegistration": "0",
        "enableSpamReporting": true,
        "enableMemberReporting": true,
        "allowEmailSubscriptions": true,
        "manuallyAuthoriseNewMembers": false,
        "emailAdminOnNewMemberSignup": "1",
        "newMembersMustConfirmAccountsViaEmail": true,
        "allowMemberSignatures": true,
        "topicsPerPage": 20,
        "allowPostsToBeMarkedAsSolution": true,
        "postsPerPage": "15",
        "activitiesPerPage": 30,
        "allowPrivateMessages": true,
        "privateMessageInboxSize": 50,
        "privateMessageFloodControl": 1,
        "allowPoints": true,
        "amountOfPointsBeforeAUserCanVote": 10,
        "pointsAddedPerNewPost": 1,
        "pointsAddedForPositiveVote": 2,
        "pointsDeductedForNegativeVote": 2,
        "pointsAddedForASolution": 4,
        "adminEmailAddress": "admin@example.com",
        "notificationReplyEmailAddress": "noreply@example.com",
        "theme": "Lumen",
        "enableAkismetSpamControl": false,
        "enterYourAkismetKeyHere": "akismet-secret",
        "enterASpamRegistrationPreventionQuestion": "What colour is the sky?",
        "enterTheAnswerToYourSpamQuestion": "blue",
        "EnableSocialLogins": false,
        "FacebookAppId": "",
        "FacebookAppSecret": "facebook-secret",
        "pageTitle": "Town Square forum",
        "metaDescription": "A place to talk",
        "newMemberStartingGroup": "Regulars, Veterans"
    })
}

/// Nodes of the standard fixture site.
///
/// ```text
/// 1  /                  home
/// 2  /forum/            colloquy (fully configured)
/// 3  /forum/login/      colloquyLogin
/// 4  /forum/register/   colloquyRegister
/// 5  /forum/general/    colloquyCategory
/// 6  /about/            page
/// 7  /support/          colloquy (forumName only)
/// 8  /support/faq/      page
/// ```
pub fn forum_tree_nodes() -> Vec<ContentNode> {
    vec![
        test_node(1, "home", "/").named("Home").build(),
        test_node(2, "colloquy", "/forum/")
            .under(1)
            .named("Forum")
            .with_properties(forum_properties())
            .build(),
        test_node(3, "colloquyLogin", "/forum/login/")
            .under(2)
            .named("Login")
            .build(),
        test_node(4, "colloquyRegister", "/forum/register/")
            .under(2)
            .named("Register")
            .build(),
        test_node(5, "colloquyCategory", "/forum/general/")
            .under(2)
            .named("General")
            .build(),
        test_node(6, "page", "/about/").under(1).named("About").build(),
        test_node(7, "colloquy", "/support/")
            .under(1)
            .named("Support")
            .with_property("forumName", json!("Help Desk"))
            .build(),
        test_node(8, "page", "/support/faq/")
            .under(7)
            .named("FAQ")
            .build(),
    ]
}

/// The standard fixture site as a content tree.
pub fn forum_tree() -> ContentTree {
    ContentTree::from_nodes(forum_tree_nodes()).expect("fixture tree is valid")
}

/// Create a test member with the forum member schema.
pub fn test_member(id: i64, username: &str) -> TestMember {
    TestMember {
        id: MemberId(id),
        username: username.to_string(),
        email: format!("member{id}@example.com"),
        properties: HashMap::from([
            (PROP_MEMBER_EMAIL.to_string(), JsonValue::Null),
            (PROP_MEMBER_SLUG.to_string(), JsonValue::Null),
        ]),
    }
}

/// A member builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestMember {
    pub id: MemberId,
    pub username: String,
    pub email: String,
    pub properties: HashMap<String, JsonValue>,
}

impl TestMember {
    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    /// Set the stored slug.
    pub fn with_slug(mut self, slug: &str) -> Self {
        self.properties
            .insert(PROP_MEMBER_SLUG.to_string(), json!(slug));
        self
    }

    /// Use a member type without the forum properties.
    pub fn without_schema(mut self) -> Self {
        self.properties.clear();
        self
    }

    pub fn build(self) -> Member {
        Member {
            id: self.id,
            username: self.username,
            email: self.email,
            properties: self.properties,
        }
    }
}

/// Assertion helpers for JSON content.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a JSON value lacks a specific key.
    pub fn lacks_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_none(),
            "Expected JSON not to have key '{key}', got: {value}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_kernel::content::ContentStore;

    #[test]
    fn fixture_tree_is_consistent() {
        let tree = forum_tree();
        assert_eq!(tree.len(), 8);
        assert_eq!(tree.nodes_of_type("colloquy").len(), 2);
        assert_eq!(tree.node_by_url("/forum/login").map(|n| n.id), Some(LOGIN_ID));
    }

    #[test]
    fn member_builder_defaults_to_forum_schema() {
        let member = test_member(4, "Ada").build();
        assert!(member.has_property(PROP_MEMBER_EMAIL));
        assert!(member.slug().is_none());

        let plain = test_member(5, "Bob").without_schema().build();
        assert!(!plain.has_property(PROP_MEMBER_EMAIL));
    }
}
