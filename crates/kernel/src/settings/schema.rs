//! Declarative mapping from root-node properties to settings fields.
//!
//! Each entry binds one property alias to one typed field. Reading goes
//! through [`apply_properties`], which converts the host's loosely typed
//! values and reports every missing or unconvertible property.

use serde::Serialize;
use serde_json::Value;

use super::{ForumSettings, ResolutionWarning, WarningKind};
use crate::content::ContentNode;

/// Segment used for topic routes when the root does not name one.
pub const DEFAULT_TOPIC_URL_NAME: &str = "topic";
/// Segment used for member routes when the root does not name one.
pub const DEFAULT_MEMBER_URL_NAME: &str = "member";
/// Segment used for virtual page routes when the root does not name one.
pub const DEFAULT_PAGE_URL_NAME: &str = "forum";

/// Property naming the starting member group(s), comma-separated.
pub const PROP_STARTING_GROUP: &str = "newMemberStartingGroup";
pub const PROP_TOPIC_URL_NAME: &str = "topicUrlName";
pub const PROP_MEMBER_URL_NAME: &str = "memberUrlName";
pub const PROP_PAGE_URL_NAME: &str = "forumUrlName";

/// Value type a property is read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Text,
    Flag,
    Number,
}

enum Field {
    Text(fn(&mut ForumSettings) -> &mut String),
    Flag(fn(&mut ForumSettings) -> &mut bool),
    Number(fn(&mut ForumSettings) -> &mut i32),
}

impl Field {
    fn kind(&self) -> PropertyKind {
        match self {
            Field::Text(_) => PropertyKind::Text,
            Field::Flag(_) => PropertyKind::Flag,
            Field::Number(_) => PropertyKind::Number,
        }
    }
}

struct Binding {
    alias: &'static str,
    field: Field,
}

const fn text(alias: &'static str, f: fn(&mut ForumSettings) -> &mut String) -> Binding {
    Binding {
        alias,
        field: Field::Text(f),
    }
}

const fn flag(alias: &'static str, f: fn(&mut ForumSettings) -> &mut bool) -> Binding {
    Binding {
        alias,
        field: Field::Flag(f),
    }
}

const fn number(alias: &'static str, f: fn(&mut ForumSettings) -> &mut i32) -> Binding {
    Binding {
        alias,
        field: Field::Number(f),
    }
}

static BINDINGS: &[Binding] = &[
    text("forumName", |s| &mut s.forum_name),
    text("forumDescription", |s| &mut s.forum_description),
    text(PROP_TOPIC_URL_NAME, |s| &mut s.topic_url_name),
    text(PROP_MEMBER_URL_NAME, |s| &mut s.member_url_name),
    text(PROP_PAGE_URL_NAME, |s| &mut s.page_url_name),
    // General
    flag("closeForum", |s| &mut s.close_forum),
    flag("allowRssFeeds", |s| &mut s.allow_rss_feeds),
    flag("suspendRegistration", |s| &mut s.suspend_registration),
    flag("enableSpamReporting", |s| &mut s.enable_spam_reporting),
    flag("enableMemberReporting", |s| &mut s.enable_member_reporting),
    flag("allowEmailSubscriptions", |s| &mut s.allow_email_subscriptions),
    flag("manuallyAuthoriseNewMembers", |s| {
        &mut s.manually_authorise_new_members
    }),
    flag("emailAdminOnNewMemberSignup", |s| {
        &mut s.email_admin_on_new_member_signup
    }),
    flag("newMembersMustConfirmAccountsViaEmail", |s| {
        &mut s.new_members_must_confirm_accounts_via_email
    }),
    flag("allowMemberSignatures", |s| &mut s.allow_member_signatures),
    number("topicsPerPage", |s| &mut s.topics_per_page),
    flag("allowPostsToBeMarkedAsSolution", |s| {
        &mut s.allow_posts_to_be_marked_as_solution
    }),
    number("postsPerPage", |s| &mut s.posts_per_page),
    number("activitiesPerPage", |s| &mut s.activities_per_page),
    flag("allowPrivateMessages", |s| &mut s.allow_private_messages),
    number("privateMessageInboxSize", |s| {
        &mut s.private_message_inbox_size
    }),
    number("privateMessageFloodControl", |s| {
        &mut s.private_message_flood_control
    }),
    // Points
    flag("allowPoints", |s| &mut s.allow_points),
    number("amountOfPointsBeforeAUserCanVote", |s| {
        &mut s.points_before_user_can_vote
    }),
    number("pointsAddedPerNewPost", |s| &mut s.points_added_per_new_post),
    number("pointsAddedForPositiveVote", |s| {
        &mut s.points_added_for_positive_vote
    }),
    number("pointsDeductedForNegativeVote", |s| {
        &mut s.points_deducted_for_negative_vote
    }),
    number("pointsAddedForASolution", |s| &mut s.points_added_for_solution),
    // Email
    text("adminEmailAddress", |s| &mut s.admin_email_address),
    text("notificationReplyEmailAddress", |s| {
        &mut s.notification_reply_email_address
    }),
    text("theme", |s| &mut s.theme),
    // Spam
    flag("enableAkismetSpamControl", |s| {
        &mut s.enable_akismet_spam_control
    }),
    text("enterYourAkismetKeyHere", |s| &mut s.akismet_key),
    text("enterASpamRegistrationPreventionQuestion", |s| &mut s.spam_question),
    text("enterTheAnswerToYourSpamQuestion", |s| &mut s.spam_answer),
    // Social
    flag("EnableSocialLogins", |s| &mut s.enable_social_logins),
    text("FacebookAppId", |s| &mut s.facebook_app_id),
    text("FacebookAppSecret", |s| &mut s.facebook_app_secret),
    // Meta
    text("pageTitle", |s| &mut s.page_title),
    text("metaDescription", |s| &mut s.meta_description),
];

/// Every property alias read from the forum root, with its type.
pub fn property_aliases() -> impl Iterator<Item = (&'static str, PropertyKind)> {
    BINDINGS.iter().map(|b| (b.alias, b.field.kind()))
}

/// Copy every bound property of `node` into `settings`.
///
/// Returns a warning for each property that is absent or cannot be
/// converted; those fields are left untouched.
pub(super) fn apply_properties(
    node: &ContentNode,
    settings: &mut ForumSettings,
) -> Vec<ResolutionWarning> {
    let mut warnings = Vec::new();

    for binding in BINDINGS {
        let Some(raw) = node.property(binding.alias) else {
            warnings.push(ResolutionWarning::new(binding.alias, WarningKind::Missing));
            continue;
        };

        let applied = match &binding.field {
            Field::Text(field) => assign(field(settings), to_text(raw)),
            Field::Flag(field) => assign(field(settings), to_flag(raw)),
            Field::Number(field) => assign(field(settings), to_number(raw)),
        };

        if !applied {
            warnings.push(ResolutionWarning::new(
                binding.alias,
                WarningKind::Mistyped {
                    expected: binding.field.kind(),
                },
            ));
        }
    }

    warnings
}

fn assign<T>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}

fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Flags arrive as booleans, `0`/`1`, or their string forms. An empty string
/// is an unticked checkbox.
fn to_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => Some(true),
            "0" | "false" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn to_number(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flags_accept_loose_forms() {
        assert_eq!(to_flag(&json!(true)), Some(true));
        assert_eq!(to_flag(&json!(0)), Some(false));
        assert_eq!(to_flag(&json!("1")), Some(true));
        assert_eq!(to_flag(&json!("False")), Some(false));
        assert_eq!(to_flag(&json!("")), Some(false));
        assert_eq!(to_flag(&json!(2)), None);
        assert_eq!(to_flag(&json!("yes please")), None);
    }

    #[test]
    fn numbers_accept_strings() {
        assert_eq!(to_number(&json!(20)), Some(20));
        assert_eq!(to_number(&json!(" 15 ")), Some(15));
        assert_eq!(to_number(&json!("ten")), None);
        assert_eq!(to_number(&json!(1.5)), None);
        assert_eq!(to_number(&json!(i64::MAX)), None);
    }

    #[test]
    fn text_accepts_scalars() {
        assert_eq!(to_text(&json!("dark")), Some("dark".to_string()));
        assert_eq!(to_text(&json!(3)), Some("3".to_string()));
        assert_eq!(to_text(&json!(["a"])), None);
    }

    #[test]
    fn aliases_are_unique() {
        let mut aliases: Vec<_> = property_aliases().map(|(a, _)| a).collect();
        let total = aliases.len();
        aliases.sort_unstable();
        aliases.dedup();
        assert_eq!(aliases.len(), total);
        assert!(total >= 25);
    }
}
