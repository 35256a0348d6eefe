//! Member slug generation.
//!
//! Slugs are derived from display names and must be unique across members.
//! Collisions are resolved with numeric suffixes: `ada`, `ada-1`, `ada-2`.

use std::collections::HashSet;

use uuid::Uuid;

/// Slug used when a display name has no ASCII alphanumerics at all.
pub const FALLBACK_SLUG: &str = "member";

/// Maximum slug length before the collision suffix.
const MAX_SLUG_LEN: usize = 128;

/// Convert a display name into a URL-safe slug.
///
/// Lowercases, replaces runs of non-alphanumeric characters with a single
/// hyphen, and trims hyphens from both ends. Long names are cut at the last
/// hyphen before the length limit.
pub fn slugify(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_hyphen = true; // Start true to skip leading hyphens
    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_was_hyphen = false;
        } else if !prev_was_hyphen {
            result.push('-');
            prev_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.len() > MAX_SLUG_LEN {
        // Pure ASCII, so any index is a char boundary.
        let truncated = &result[..MAX_SLUG_LEN];
        result = match truncated.rfind('-') {
            Some(last_hyphen) => truncated[..last_hyphen].to_string(),
            None => truncated.to_string(),
        };
    }

    if result.is_empty() {
        return FALLBACK_SLUG.to_string();
    }

    result
}

/// Pick a unique slug for a member.
///
/// * `candidate`: slug derived from the current display name.
/// * `taken`: slugs already held by *other* members that share the candidate.
/// * `previous`: the member's own stored slug, if any.
///
/// A member whose name did not change keeps its slug, bare or suffixed, as
/// long as no other member holds it.
pub fn generate_slug<'a, I>(candidate: &str, taken: I, previous: Option<&str>) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: HashSet<&str> = taken.into_iter().collect();

    // A previous slug for the same base is still ours, even if the bare
    // candidate has since been freed.
    if let Some(prev) = previous
        && (prev == candidate || is_suffixed(prev, candidate))
        && !taken.contains(prev)
    {
        return prev.to_string();
    }

    if !taken.contains(candidate) {
        return candidate.to_string();
    }

    for i in 1..100 {
        let suffixed = format!("{candidate}-{i}");
        if !taken.contains(suffixed.as_str()) {
            return suffixed;
        }
    }

    let fragment = &Uuid::now_v7().simple().to_string()[24..];
    format!("{candidate}-{fragment}")
}

/// Check whether `slug` is `base` followed by `-<digits>`.
pub fn is_suffixed(slug: &str, base: &str) -> bool {
    slug.strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Ada Lovelace"), "ada-lovelace");
        assert_eq!(slugify("  grace   hopper  "), "grace-hopper");
        assert_eq!(slugify("O'Brien & Sons!"), "o-brien-sons");
    }

    #[test]
    fn slugify_non_ascii_falls_back() {
        assert_eq!(slugify("ユーザー"), FALLBACK_SLUG);
        assert_eq!(slugify("---"), FALLBACK_SLUG);
        assert_eq!(slugify("Zoë"), "zo");
    }

    #[test]
    fn slugify_truncates_on_word_boundary() {
        let long = format!("{} tail", "word ".repeat(40));
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
        assert!(slug.ends_with("word"));
    }

    #[test]
    fn free_candidate_is_used() {
        assert_eq!(generate_slug("ada", std::iter::empty(), None), "ada");
        assert_eq!(generate_slug("ada", ["ada-lovelace"], None), "ada");
    }

    #[test]
    fn collision_gets_suffix() {
        assert_eq!(generate_slug("ada", ["ada"], None), "ada-1");
        assert_eq!(generate_slug("ada", ["ada", "ada-1", "ada-3"], None), "ada-2");
    }

    #[test]
    fn unchanged_name_keeps_slug() {
        assert_eq!(generate_slug("ada", ["ada-1"], Some("ada")), "ada");
    }

    #[test]
    fn duplicated_previous_slug_is_reassigned() {
        assert_eq!(generate_slug("ada", ["ada"], Some("ada")), "ada-1");
    }

    #[test]
    fn previous_slug_is_not_a_conflict() {
        // The member already holds "ada-1" from an earlier collision.
        assert_eq!(generate_slug("ada", ["ada"], Some("ada-1")), "ada-1");
    }

    #[test]
    fn suffixed_slug_survives_freed_candidate() {
        // "ada" was released by a deleted member; "ada-1" stays put.
        assert_eq!(generate_slug("ada", std::iter::empty(), Some("ada-1")), "ada-1");
        assert_eq!(generate_slug("ada", ["ada-2"], Some("ada-1")), "ada-1");
    }

    #[test]
    fn suffixed_slug_of_another_base_is_replaced() {
        assert_eq!(generate_slug("ada", std::iter::empty(), Some("bob-1")), "ada");
    }

    #[test]
    fn rename_frees_nothing_for_others() {
        // Renamed from "bob" to "ada" while another member holds "ada".
        assert_eq!(generate_slug("ada", ["ada"], Some("bob")), "ada-1");
    }

    #[test]
    fn exhausted_suffixes_use_fragment() {
        let taken: Vec<String> = std::iter::once("ada".to_string())
            .chain((1..100).map(|i| format!("ada-{i}")))
            .collect();
        let slug = generate_slug("ada", taken.iter().map(String::as_str), None);
        assert!(slug.starts_with("ada-"));
        assert!(!taken.contains(&slug));
    }

    #[test]
    fn suffix_detection() {
        assert!(is_suffixed("ada-12", "ada"));
        assert!(!is_suffixed("ada-", "ada"));
        assert!(!is_suffixed("ada-lovelace", "ada"));
        assert!(!is_suffixed("ada", "ada"));
    }
}
