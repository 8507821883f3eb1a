//! Cross-reference linking of stylesheets into markup
//!
//! Every markup artifact gets one `<link rel="stylesheet">` element per
//! stylesheet artifact in the bundle, in stylesheet ordinal order, inserted
//! right before `</head>`. Without a head close the links go right before
//! the opening `<body`; without either the artifact is left untouched and a
//! [`BuildWarning::Unlinked`] is reported.
//!
//! An artifact is rewritten at most once: [`link_stylesheets`] skips
//! artifacts that are already linked, so calling it again never duplicates
//! references.

use tracing::{debug, warn};

use crate::domain::{Artifact, ArtifactKind, BuildWarning};

const HEAD_CLOSE: &str = "</head>";
const BODY_OPEN: &str = "<body";

/// Render the reference element for one stylesheet
pub fn stylesheet_reference(name: &str) -> String {
    format!("    <link rel=\"stylesheet\" href=\"{name}\">\n")
}

/// Byte offset at which references are inserted, if any
pub fn insertion_point(content: &str) -> Option<usize> {
    let lower = content.to_ascii_lowercase();
    lower.find(HEAD_CLOSE).or_else(|| lower.find(BODY_OPEN))
}

/// Link every stylesheet into every markup artifact
///
/// Returns the warnings for markup artifacts that could not be linked.
pub fn link_stylesheets(artifacts: &mut [Artifact]) -> Vec<BuildWarning> {
    let mut stylesheets: Vec<(usize, String)> = artifacts
        .iter()
        .filter(|a| a.kind == ArtifactKind::Stylesheet)
        .map(|a| (a.ordinal, a.name.clone()))
        .collect();
    if stylesheets.is_empty() {
        return Vec::new();
    }
    stylesheets.sort_by_key(|(ordinal, _)| *ordinal);

    let references: String = stylesheets
        .iter()
        .map(|(_, name)| stylesheet_reference(name))
        .collect();

    let mut warnings = Vec::new();
    for artifact in artifacts
        .iter_mut()
        .filter(|a| a.kind == ArtifactKind::Markup && !a.is_linked())
    {
        match insertion_point(artifact.content()) {
            Some(at) if artifact.inject(at, &references) => {
                debug!(
                    artifact = %artifact.name,
                    stylesheets = stylesheets.len(),
                    "Linked stylesheets"
                );
            }
            _ => {
                warn!(artifact = %artifact.name, "No head or body found, stylesheets not linked");
                warnings.push(BuildWarning::Unlinked {
                    name: artifact.name.clone(),
                });
            }
        }
    }

    warnings
}
