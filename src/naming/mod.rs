//! File naming for artifacts
//!
//! Base names are a pure function of kind and content ([`base_name`]), so the
//! same artifact always gets the same base name. Uniqueness within a bundle
//! is enforced in exactly one place, [`NamingContext::resolve`], which
//! appends `-2`, `-3`, ... before the extension until the name is free.
//!
//! Heuristics are kept as ordered tables so each rule can be tested alone:
//! - markup: title extractors, then purpose markers that override the title
//! - stylesheets: keyword rules, then the first selector
//! - scripts: an entry-point marker

pub mod slug;

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::ArtifactKind;
use slug::{slugify, strip_markup};

/// Markup fallback name
pub const DEFAULT_MARKUP_NAME: &str = "index";
/// Stylesheet fallback name
pub const DEFAULT_STYLESHEET_NAME: &str = "style";
/// Script fallback name
pub const DEFAULT_SCRIPT_NAME: &str = "script";
/// Script name used when the entry-point marker is present
pub const ENTRY_SCRIPT_NAME: &str = "main";
/// Token marking a script as the page entry point
pub const SCRIPT_ENTRY_MARKER: &str = "DOMContentLoaded";
/// Prefix of synthesized names for unknown artifacts
pub const UNKNOWN_NAME_PREFIX: &str = "file";

/// Purpose-specific markup names and the markers (lowercase) that select them
const PURPOSE_MARKERS: &[(&str, &[&str])] = &[
    ("reservation", &["reservation-form", "make a reservation"]),
    ("about", &["about-content", "why choose us"]),
    ("contact", &["contact-form", "get in touch"]),
];

/// Stylesheet names and their keyword patterns, in priority order
const STYLESHEET_RULES: &[(&str, &str)] = &[
    ("nav", r"navbar|navigation"),
    ("footer", r"footer"),
    ("forms", r"\bform\b|\binput\b"),
    ("responsive", r"@media"),
    ("animations", r"animation|@keyframes"),
];

/// Title extractors for markup, in priority order
static TITLE_EXTRACTORS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?is)<title[^>]*>(?P<text>.*?)</title>",
        r"(?is)<h1[^>]*>(?P<text>.*?)</h1>",
        r#"(?is)<(?P<tag>div|header|section|span|p)\b[^>]*\bclass\s*=\s*["'](?P<label>[^"']*title[^"']*)["'][^>]*>(?P<text>.*?)</(?:div|header|section|span|p)>"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("title extractor regex should compile"))
    .collect()
});

static STYLESHEET_MATCHERS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    STYLESHEET_RULES
        .iter()
        .map(|(name, pattern)| {
            (
                *name,
                Regex::new(pattern).expect("stylesheet rule regex should compile"),
            )
        })
        .collect()
});

static FIRST_SELECTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[.#]([a-z][a-z0-9_-]*)\s*\{").expect("FIRST_SELECTOR_RE regex should compile")
});

/// A resolved, bundle-unique file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    /// Base name before any collision suffix, without extension
    pub base: String,
    /// Final file name, unique within the bundle
    pub file_name: String,
    /// Whether a collision suffix had to be appended
    pub collided: bool,
}

/// Per-bundle naming state
///
/// Tracks taken file names and the counter used for unknown artifacts. One
/// context is created per bundle and never shared.
#[derive(Debug, Default)]
pub struct NamingContext {
    taken: HashSet<String>,
    unknown_counter: usize,
}

impl NamingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a unique file name for an artifact of `kind` with `content`
    pub fn resolve(&mut self, kind: ArtifactKind, content: &str) -> ResolvedName {
        let base = if kind == ArtifactKind::Unknown {
            self.unknown_counter += 1;
            format!("{}-{}", UNKNOWN_NAME_PREFIX, self.unknown_counter)
        } else {
            base_name(kind, content)
        };

        let extension = kind.extension();
        let mut file_name = format!("{base}.{extension}");
        let mut suffix = 2;
        while self.taken.contains(&file_name) {
            file_name = format!("{base}-{suffix}.{extension}");
            suffix += 1;
        }

        let collided = suffix > 2;
        self.taken.insert(file_name.clone());
        ResolvedName {
            base,
            file_name,
            collided,
        }
    }

    /// Number of names handed out so far
    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}

/// Deterministic base name (no extension, no collision suffix)
///
/// Unknown artifacts have no content-derived name; they get the bare
/// [`UNKNOWN_NAME_PREFIX`] here and a counter from [`NamingContext`].
pub fn base_name(kind: ArtifactKind, content: &str) -> String {
    match kind {
        ArtifactKind::Markup => markup_name(content),
        ArtifactKind::Stylesheet => stylesheet_name(content),
        ArtifactKind::Script => script_name(content),
        ArtifactKind::Unknown => UNKNOWN_NAME_PREFIX.to_string(),
    }
}

fn markup_name(content: &str) -> String {
    if let Some(purpose) = purpose_name(content) {
        return purpose.to_string();
    }
    extract_title(content).unwrap_or_else(|| DEFAULT_MARKUP_NAME.to_string())
}

/// Purpose marker that overrides any extracted title
fn purpose_name(content: &str) -> Option<&'static str> {
    let lower = content.to_lowercase();
    PURPOSE_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| lower.contains(m)))
        .map(|(name, _)| *name)
}

/// First non-empty title slug from the ordered extractors
pub fn extract_title(content: &str) -> Option<String> {
    TITLE_EXTRACTORS.iter().find_map(|extractor| {
        extractor.captures_iter(content).find_map(|caps| {
            let from_text = caps
                .name("text")
                .map(|m| slugify(&strip_markup(m.as_str())))
                .filter(|s| !s.is_empty());
            from_text.or_else(|| {
                caps.name("label")
                    .map(|m| slugify(m.as_str()))
                    .filter(|s| !s.is_empty())
            })
        })
    })
}

fn stylesheet_name(content: &str) -> String {
    let lower = content.to_lowercase();

    if let Some((name, _)) = STYLESHEET_MATCHERS.iter().find(|(_, re)| re.is_match(&lower)) {
        return (*name).to_string();
    }

    FIRST_SELECTOR_RE
        .captures(&lower)
        .and_then(|caps| caps.get(1))
        .map(|m| slugify(m.as_str()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_STYLESHEET_NAME.to_string())
}

fn script_name(content: &str) -> String {
    if content.contains(SCRIPT_ENTRY_MARKER) {
        ENTRY_SCRIPT_NAME.to_string()
    } else {
        DEFAULT_SCRIPT_NAME.to_string()
    }
}
