//! Artifact domain types
//!
//! An artifact is a classified, named file derived from exactly one segment.

use std::fmt;

use serde::Serialize;

/// The kind of content an artifact holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Markup,
    Stylesheet,
    Script,
    Unknown,
}

impl ArtifactKind {
    /// File extension (without the dot) used when materializing this kind
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markup => "html",
            Self::Stylesheet => "css",
            Self::Script => "js",
            Self::Unknown => "txt",
        }
    }

    /// Materialization rank: stylesheets first, then markup, then the rest
    pub(crate) fn write_rank(self) -> u8 {
        match self {
            Self::Stylesheet => 0,
            Self::Markup => 1,
            Self::Script | Self::Unknown => 2,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markup => write!(f, "markup"),
            Self::Stylesheet => write!(f, "stylesheet"),
            Self::Script => write!(f, "script"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A classified and named file destined for the bundle workspace
///
/// `name` is unique within the owning bundle. The content of a markup
/// artifact may be rewritten once by the linker; every other artifact is
/// immutable after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub ordinal: usize,
    pub kind: ArtifactKind,
    pub name: String,
    content: String,
    linked: bool,
}

impl Artifact {
    pub(crate) fn new(
        ordinal: usize,
        kind: ArtifactKind,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            ordinal,
            kind,
            name: name.into(),
            content: content.into(),
            linked: false,
        }
    }

    /// Final content of the artifact
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the linker has already rewritten this artifact
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Insert `text` at byte offset `at`, marking the artifact as linked.
    ///
    /// Returns `false` without touching the content if the artifact is not
    /// markup, was already linked, or `at` is not a char boundary.
    pub(crate) fn inject(&mut self, at: usize, text: &str) -> bool {
        if self.kind != ArtifactKind::Markup || self.linked || !self.content.is_char_boundary(at) {
            return false;
        }
        self.content.insert_str(at, text);
        self.linked = true;
        true
    }
}
