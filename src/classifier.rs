//! Artifact classification
//!
//! Classification runs in two stages:
//! 1. **Tag match**: a recognised declared tag decides the kind outright.
//! 2. **Content sniff**: otherwise an ordered table of [`SniffRule`]s is
//!    tried top to bottom and the first match wins.
//!
//! Brace-only matching is the last sniff rule: script declaration keywords
//! are checked first, so a script of object literals is still a script.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{ArtifactKind, Segment};

/// Declared tags recognised per kind (matched case-insensitively)
const TAG_LABELS: &[(ArtifactKind, &[&str])] = &[
    (ArtifactKind::Markup, &["html", "htm", "xhtml", "markup"]),
    (
        ArtifactKind::Stylesheet,
        &["css", "stylesheet", "style", "styles"],
    ),
    (
        ArtifactKind::Script,
        &["javascript", "js", "mjs", "cjs", "ecmascript", "script"],
    ),
];

static MARKUP_ROOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*<!doctype\s+html|<html[\s>]").expect("MARKUP_ROOT_RE regex should compile")
});

static AT_RULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@(?:media|keyframes|import|font-face|supports|charset)\b")
        .expect("AT_RULE_RE regex should compile")
});

static SCRIPT_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bfunction\s*[A-Za-z_$]*\s*\(|\b(?:const|let|var)\s+[A-Za-z_$][\w$]*\s*[=;,]|\)\s*=>")
        .expect("SCRIPT_KEYWORD_RE regex should compile")
});

static DECLARATION_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^{};\s][^{};]*\{\s*[-A-Za-z]+\s*:[^{}]*\}")
        .expect("DECLARATION_BLOCK_RE regex should compile")
});

/// One content heuristic: if `matches` holds, the segment is `kind`.
#[derive(Debug, Clone, Copy)]
pub struct SniffRule {
    pub name: &'static str,
    pub kind: ArtifactKind,
    pub matches: fn(&str) -> bool,
}

/// Content heuristics, in priority order
pub const SNIFF_RULES: &[SniffRule] = &[
    SniffRule {
        name: "document-root",
        kind: ArtifactKind::Markup,
        matches: has_markup_root,
    },
    SniffRule {
        name: "at-rule-blocks",
        kind: ArtifactKind::Stylesheet,
        matches: has_at_rule_blocks,
    },
    SniffRule {
        name: "declaration-keywords",
        kind: ArtifactKind::Script,
        matches: has_script_keywords,
    },
    SniffRule {
        name: "declaration-blocks",
        kind: ArtifactKind::Stylesheet,
        matches: has_declaration_blocks,
    },
];

/// How a segment got its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifiedBy {
    /// The declared tag was recognised.
    Tag,
    /// A content rule matched; carries the rule name.
    Sniff(&'static str),
    /// Nothing matched; the kind is `Unknown`.
    Fallback,
}

/// Result of classifying one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: ArtifactKind,
    pub by: ClassifiedBy,
}

impl Classification {
    /// Whether classification gave up and fell back to `Unknown`
    pub fn is_ambiguous(&self) -> bool {
        self.by == ClassifiedBy::Fallback
    }
}

/// Classify a segment from its declared tag, then its content
pub fn classify(segment: &Segment) -> Classification {
    if let Some(kind) = segment.declared_tag.as_deref().and_then(kind_for_tag) {
        return Classification {
            kind,
            by: ClassifiedBy::Tag,
        };
    }

    sniff(&segment.raw_content)
}

/// Map a declared tag to a kind, tolerating case and common synonyms
pub fn kind_for_tag(tag: &str) -> Option<ArtifactKind> {
    let tag = tag.trim().to_ascii_lowercase();
    TAG_LABELS
        .iter()
        .find(|(_, labels)| labels.contains(&tag.as_str()))
        .map(|(kind, _)| *kind)
}

/// Classify by content alone, walking [`SNIFF_RULES`] in order
pub fn sniff(content: &str) -> Classification {
    SNIFF_RULES
        .iter()
        .find(|rule| (rule.matches)(content))
        .map_or(
            Classification {
                kind: ArtifactKind::Unknown,
                by: ClassifiedBy::Fallback,
            },
            |rule| Classification {
                kind: rule.kind,
                by: ClassifiedBy::Sniff(rule.name),
            },
        )
}

fn has_markup_root(content: &str) -> bool {
    MARKUP_ROOT_RE.is_match(content)
}

fn has_at_rule_blocks(content: &str) -> bool {
    has_balanced_braces(content) && AT_RULE_RE.is_match(content)
}

fn has_script_keywords(content: &str) -> bool {
    SCRIPT_KEYWORD_RE.is_match(content)
}

fn has_declaration_blocks(content: &str) -> bool {
    has_balanced_braces(content) && DECLARATION_BLOCK_RE.is_match(content)
}

/// At least one brace pair, never closing more than was opened.
fn has_balanced_braces(content: &str) -> bool {
    let mut depth: usize = 0;
    let mut opened = false;
    for c in content.chars() {
        match c {
            '{' => {
                depth += 1;
                opened = true;
            }
            '}' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    opened && depth == 0
}
