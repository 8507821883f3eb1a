//! Slug normalization for file names

use std::sync::LazyLock;

use regex::Regex;

/// Longest slug kept for a file base name
pub const MAX_SLUG_LEN: usize = 60;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("TAG_RE regex should compile"));

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:[A-Za-z]+|#[0-9]+|#x[0-9A-Fa-f]+);").expect("ENTITY_RE regex should compile")
});

/// Convert text to a lowercase hyphenated slug
///
/// Runs of anything other than ASCII letters and digits collapse to a single
/// hyphen; leading and trailing hyphens are stripped. May return an empty
/// string.
///
/// # Examples
/// ```
/// use sitepack::naming::slug::slugify;
/// assert_eq!(slugify("My  Cafe!"), "my-cafe");
/// assert_eq!(slugify("--"), "");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        let trimmed_len = slug.trim_end_matches('-').len();
        slug.truncate(trimmed_len);
    }

    slug
}

/// Strip tags and character entities from a markup fragment
pub fn strip_markup(fragment: &str) -> String {
    let without_tags = TAG_RE.replace_all(fragment, " ");
    ENTITY_RE.replace_all(&without_tags, " ").into_owned()
}
