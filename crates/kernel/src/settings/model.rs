//! Forum settings snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::PropertyKind;
use crate::content::NodeId;
use crate::members::MemberGroup;

/// Immutable configuration of one forum instance.
///
/// Built once per request from the forum root node and discarded with the
/// request. Every page URL is always populated: either with the page's URL or
/// with a human-readable "Unable to find ..." placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForumSettings {
    // Identity
    pub forum_id: NodeId,
    pub forum_root_url: String,
    pub forum_root_url_with_domain: String,
    pub forum_name: String,
    pub forum_description: String,

    // URL segment names for virtual routes
    pub topic_url_name: String,
    pub member_url_name: String,
    pub page_url_name: String,

    // Special pages
    pub login_url: String,
    pub register_url: String,
    pub create_topic_url: String,
    pub edit_member_url: String,
    pub search_members_url: String,
    pub create_private_message_url: String,

    // General
    pub close_forum: bool,
    pub allow_rss_feeds: bool,
    pub suspend_registration: bool,
    pub enable_spam_reporting: bool,
    pub enable_member_reporting: bool,
    pub allow_email_subscriptions: bool,
    pub manually_authorise_new_members: bool,
    pub email_admin_on_new_member_signup: bool,
    pub new_members_must_confirm_accounts_via_email: bool,
    pub allow_member_signatures: bool,
    pub topics_per_page: i32,
    pub allow_posts_to_be_marked_as_solution: bool,
    pub posts_per_page: i32,
    pub activities_per_page: i32,
    pub allow_private_messages: bool,
    pub private_message_inbox_size: i32,
    pub private_message_flood_control: i32,

    // Points
    pub allow_points: bool,
    pub points_before_user_can_vote: i32,
    pub points_added_per_new_post: i32,
    pub points_added_for_positive_vote: i32,
    pub points_deducted_for_negative_vote: i32,
    pub points_added_for_solution: i32,

    // Email
    pub admin_email_address: String,
    pub notification_reply_email_address: String,

    pub theme: String,

    /// Group new members are placed in.
    pub starting_group: Option<MemberGroup>,

    // Spam
    pub enable_akismet_spam_control: bool,
    #[serde(skip_serializing)]
    pub akismet_key: String,
    pub spam_question: String,
    #[serde(skip_serializing)]
    pub spam_answer: String,

    // Social
    pub enable_social_logins: bool,
    pub facebook_app_id: String,
    #[serde(skip_serializing)]
    pub facebook_app_secret: String,

    // Meta
    pub page_title: String,
    pub meta_description: String,

    /// Update date of the forum root node.
    pub last_modified: DateTime<Utc>,

    /// Problems found while reading the root node.
    pub warnings: Vec<ResolutionWarning>,
}

/// A property or lookup that could not be read as expected.
///
/// Resolution never fails on these; the affected field keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionWarning {
    /// Property alias or document type the warning concerns.
    pub subject: String,
    pub kind: WarningKind,
}

/// Why a [`ResolutionWarning`] was raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningKind {
    /// The root node has no value for the property.
    Missing,
    /// The value cannot be converted to the field's type.
    Mistyped { expected: PropertyKind },
    /// No page of the document type exists around the root.
    PageNotFound,
    /// The configured member group does not exist.
    GroupNotFound,
}

impl ResolutionWarning {
    pub fn new(subject: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            subject: subject.into(),
            kind,
        }
    }
}
