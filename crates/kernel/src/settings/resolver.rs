//! Root node → settings snapshot.

use tracing::debug;

use super::schema::{
    DEFAULT_MEMBER_URL_NAME, DEFAULT_PAGE_URL_NAME, DEFAULT_TOPIC_URL_NAME, PROP_STARTING_GROUP,
    apply_properties,
};
use super::{ForumOptions, ForumSettings, ResolutionWarning, WarningKind};
use crate::content::{ContentNode, ContentStore};
use crate::members::MemberGroupDirectory;

/// Builds [`ForumSettings`] from a forum root node.
///
/// Pure: no caching and no mutation of its inputs, so it is safe to call
/// repeatedly and from several threads.
pub struct SettingsResolver<'a> {
    content: &'a dyn ContentStore,
    groups: &'a dyn MemberGroupDirectory,
    options: &'a ForumOptions,
    /// Scheme and host prefixed to the root URL.
    domain: &'a str,
}

impl<'a> SettingsResolver<'a> {
    pub fn new(
        content: &'a dyn ContentStore,
        groups: &'a dyn MemberGroupDirectory,
        options: &'a ForumOptions,
        domain: &'a str,
    ) -> Self {
        Self {
            content,
            groups,
            options,
            domain,
        }
    }

    /// Resolve settings for a forum root.
    ///
    /// Returns `None` when there is no root; that means "forum not configured",
    /// not an error. Missing pages and properties never abort resolution.
    pub fn resolve(&self, root: Option<&ContentNode>) -> Option<ForumSettings> {
        let root = root?;
        let types = &self.options.doc_types;

        let mut settings = ForumSettings {
            forum_id: root.id,
            forum_root_url: root.url.clone(),
            forum_root_url_with_domain: format!(
                "{}{}",
                self.domain.trim_end_matches('/'),
                root.url
            ),
            last_modified: root.update_date,
            ..ForumSettings::default()
        };

        let mut warnings = apply_properties(root, &mut settings);

        default_if_empty(&mut settings.topic_url_name, DEFAULT_TOPIC_URL_NAME);
        default_if_empty(&mut settings.member_url_name, DEFAULT_MEMBER_URL_NAME);
        default_if_empty(&mut settings.page_url_name, DEFAULT_PAGE_URL_NAME);

        settings.login_url = self.page_url(root, &types.login, "login", &mut warnings);
        settings.register_url = self.page_url(root, &types.register, "register", &mut warnings);
        settings.create_topic_url =
            self.page_url(root, &types.create_topic, "create topic", &mut warnings);
        settings.edit_member_url =
            self.page_url(root, &types.edit_member, "edit member", &mut warnings);
        settings.search_members_url =
            self.page_url(root, &types.search_members, "search members", &mut warnings);
        settings.create_private_message_url = self.page_url(
            root,
            &types.send_private_message,
            "create private message",
            &mut warnings,
        );

        let group_name = match root.property_str(PROP_STARTING_GROUP) {
            // Only the first group is used when several are listed.
            Some(csv) => csv.split(',').next().unwrap_or(csv).trim(),
            None => self.options.default_member_group.as_str(),
        };
        settings.starting_group = self.groups.group_by_name(group_name);
        if settings.starting_group.is_none() {
            warnings.push(ResolutionWarning::new(group_name, WarningKind::GroupNotFound));
        }

        for warning in &warnings {
            debug!(
                forum = %root.id,
                subject = %warning.subject,
                kind = ?warning.kind,
                "forum setting not resolved"
            );
        }
        settings.warnings = warnings;

        Some(settings)
    }

    /// URL of the nearest page of type `alias` below the root, else above it.
    fn page_url(
        &self,
        root: &ContentNode,
        alias: &str,
        label: &str,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> String {
        let page = self
            .content
            .descendant_of_type(root, alias)
            .or_else(|| self.content.ancestor_of_type(root, alias));

        match page {
            Some(page) => page.url.clone(),
            None => {
                warnings.push(ResolutionWarning::new(alias, WarningKind::PageNotFound));
                format!("Unable to find {label} page")
            }
        }
    }
}

fn default_if_empty(value: &mut String, default: &str) {
    if value.is_empty() {
        *value = default.to_string();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::content::{ContentTree, NodeId};
    use crate::members::MemoryMemberStore;

    const TREE: &str = r#"[
        {"id": 1, "content_type_alias": "home", "name": "Home", "url": "/", "update_date": "2026-01-01T00:00:00Z"},
        {"id": 2, "parent_id": 1, "content_type_alias": "colloquyRegister", "name": "Join", "url": "/join/", "update_date": "2026-01-01T00:00:00Z"},
        {"id": 3, "parent_id": 2, "content_type_alias": "colloquy", "name": "Forum", "url": "/join/forum/", "update_date": "2026-03-04T05:06:07Z",
         "properties": {
            "forumName": "Town Square",
            "topicsPerPage": "20",
            "postsPerPage": 15,
            "closeForum": "0",
            "allowPoints": true,
            "theme": "slate",
            "pointsAddedPerNewPost": "lots",
            "newMemberStartingGroup": "Regulars, Moderators"
         }},
        {"id": 4, "parent_id": 3, "content_type_alias": "colloquyLogin", "name": "Login", "url": "/join/forum/login/", "update_date": "2026-01-01T00:00:00Z"}
    ]"#;

    fn fixture() -> (ContentTree, MemoryMemberStore, ForumOptions) {
        let groups = MemoryMemberStore::new();
        groups.add_group("Regulars");
        groups.add_group(ForumOptions::DEFAULT_MEMBER_GROUP);
        (
            ContentTree::from_json(TREE).unwrap(),
            groups,
            ForumOptions::default(),
        )
    }

    #[test]
    fn no_root_means_no_settings() {
        let (tree, groups, options) = fixture();
        let resolver = SettingsResolver::new(&tree, &groups, &options, "https://example.com");
        assert!(resolver.resolve(None).is_none());
    }

    #[test]
    fn reads_identity_and_typed_properties() {
        let (tree, groups, options) = fixture();
        let resolver = SettingsResolver::new(&tree, &groups, &options, "https://example.com/");
        let root = tree.node(NodeId(3)).unwrap();
        let settings = resolver.resolve(Some(&root)).unwrap();

        assert_eq!(settings.forum_id, NodeId(3));
        assert_eq!(settings.forum_root_url, "/join/forum/");
        assert_eq!(
            settings.forum_root_url_with_domain,
            "https://example.com/join/forum/"
        );
        assert_eq!(settings.forum_name, "Town Square");
        assert_eq!(settings.topics_per_page, 20);
        assert_eq!(settings.posts_per_page, 15);
        assert!(!settings.close_forum);
        assert!(settings.allow_points);
        assert_eq!(settings.theme, "slate");
        assert_eq!(settings.last_modified, root.update_date);
    }

    #[test]
    fn pages_found_below_then_above() {
        let (tree, groups, options) = fixture();
        let resolver = SettingsResolver::new(&tree, &groups, &options, "");
        let root = tree.node(NodeId(3)).unwrap();
        let settings = resolver.resolve(Some(&root)).unwrap();

        assert_eq!(settings.login_url, "/join/forum/login/");
        assert_eq!(settings.register_url, "/join/");
        assert_eq!(settings.create_topic_url, "Unable to find create topic page");
        assert_eq!(
            settings.create_private_message_url,
            "Unable to find create private message page"
        );
    }

    #[test]
    fn every_url_field_is_populated() {
        let (tree, groups, options) = fixture();
        let resolver = SettingsResolver::new(&tree, &groups, &options, "");
        let root = tree.node(NodeId(3)).unwrap();
        let s = resolver.resolve(Some(&root)).unwrap();

        for url in [
            &s.login_url,
            &s.register_url,
            &s.create_topic_url,
            &s.edit_member_url,
            &s.search_members_url,
            &s.create_private_message_url,
        ] {
            assert!(!url.is_empty());
        }
    }

    #[test]
    fn first_listed_group_is_used() {
        let (tree, groups, options) = fixture();
        let resolver = SettingsResolver::new(&tree, &groups, &options, "");
        let root = tree.node(NodeId(3)).unwrap();
        let settings = resolver.resolve(Some(&root)).unwrap();
        assert_eq!(settings.starting_group.unwrap().name, "Regulars");
    }

    #[test]
    fn default_group_when_unset() {
        let (tree, groups, options) = fixture();
        let resolver = SettingsResolver::new(&tree, &groups, &options, "");
        let login = tree.node(NodeId(4)).unwrap();
        // Resolving from a node without the property exercises the fallback.
        let settings = resolver.resolve(Some(&login)).unwrap();
        assert_eq!(
            settings.starting_group.unwrap().name,
            ForumOptions::DEFAULT_MEMBER_GROUP
        );
    }

    #[test]
    fn problems_become_warnings() {
        let (tree, groups, options) = fixture();
        let resolver = SettingsResolver::new(&tree, &groups, &options, "");
        let root = tree.node(NodeId(3)).unwrap();
        let settings = resolver.resolve(Some(&root)).unwrap();

        assert_eq!(settings.points_added_per_new_post, 0);
        assert!(settings.warnings.contains(&ResolutionWarning::new(
            "pointsAddedPerNewPost",
            WarningKind::Mistyped {
                expected: crate::settings::PropertyKind::Number
            }
        )));
        assert!(
            settings
                .warnings
                .contains(&ResolutionWarning::new("enterYourAkismetKeyHere", WarningKind::Missing))
        );
        assert!(settings.warnings.contains(&ResolutionWarning::new(
            "colloquyCreateTopic",
            WarningKind::PageNotFound
        )));
    }

    #[test]
    fn url_names_default() {
        let (tree, groups, options) = fixture();
        let resolver = SettingsResolver::new(&tree, &groups, &options, "");
        let root = tree.node(NodeId(3)).unwrap();
        let settings = resolver.resolve(Some(&root)).unwrap();
        assert_eq!(settings.topic_url_name, "topic");
        assert_eq!(settings.member_url_name, "member");
        assert_eq!(settings.page_url_name, "forum");
    }

    #[test]
    fn resolving_twice_is_identical() {
        let (tree, groups, options) = fixture();
        let resolver = SettingsResolver::new(&tree, &groups, &options, "https://example.com");
        let root = tree.node(NodeId(3)).unwrap();
        assert_eq!(resolver.resolve(Some(&root)), resolver.resolve(Some(&root)));
    }
}
