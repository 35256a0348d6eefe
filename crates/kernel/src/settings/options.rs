//! Module-level options.

/// Document type aliases the forum looks for in the content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTypes {
    /// Forum root; also the reserved alias watched for route changes.
    pub forum_root: String,
    pub login: String,
    pub register: String,
    pub create_topic: String,
    pub edit_member: String,
    pub search_members: String,
    pub send_private_message: String,
}

impl DocTypes {
    /// Derive the page aliases from a root alias: `colloquy` → `colloquyLogin`, ...
    pub fn with_root(root: &str) -> Self {
        Self {
            forum_root: root.to_string(),
            login: format!("{root}Login"),
            register: format!("{root}Register"),
            create_topic: format!("{root}CreateTopic"),
            edit_member: format!("{root}EditMember"),
            search_members: format!("{root}SearchMembers"),
            send_private_message: format!("{root}SendPrivateMessage"),
        }
    }
}

impl Default for DocTypes {
    fn default() -> Self {
        Self::with_root(ForumOptions::DEFAULT_ROOT_ALIAS)
    }
}

/// Options for the forum module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumOptions {
    pub doc_types: DocTypes,
    /// Group new members join when the forum root names none.
    pub default_member_group: String,
}

impl ForumOptions {
    pub const DEFAULT_ROOT_ALIAS: &'static str = "colloquy";
    pub const DEFAULT_MEMBER_GROUP: &'static str = "Colloquy Standard";

    /// Options for a forum rooted at `alias`.
    pub fn with_root_alias(alias: &str) -> Self {
        Self {
            doc_types: DocTypes::with_root(alias),
            ..Self::default()
        }
    }
}

impl Default for ForumOptions {
    fn default() -> Self {
        Self {
            doc_types: DocTypes::default(),
            default_member_group: Self::DEFAULT_MEMBER_GROUP.to_string(),
        }
    }
}
