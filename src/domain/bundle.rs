//! Bundle domain types
//!
//! Contains the project bundle, its lifecycle states and the non-fatal
//! warnings collected while building it.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Artifact, ArtifactKind};
use crate::hash;

/// Lifecycle state of a bundle
///
/// States only move forward:
/// ```text
/// Created → Materialized → Packaged → Served → Purged
/// ```
/// `Packaged → Purged` is taken by the orphan sweep, and any non-terminal
/// state may move to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleState {
    Created,
    Materialized,
    Packaged,
    Served,
    Purged,
    Failed,
}

impl BundleState {
    /// Whether this is a terminal state (no further transitions allowed).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Purged | Self::Failed)
    }

    /// Whether the bundle still owns files on disk or is about to.
    pub fn is_live(self) -> bool {
        !self.is_terminal()
    }

    /// Whether moving from `self` to `to` is a legal edge of the state graph.
    pub fn can_transition_to(self, to: BundleState) -> bool {
        use BundleState::*;

        if to == Failed && !self.is_terminal() {
            return true;
        }

        matches!(
            (self, to),
            (Created, Materialized)
                | (Materialized, Packaged)
                | (Packaged, Served)
                | (Served, Purged)
                // orphan sweep
                | (Packaged, Purged)
        )
    }
}

impl fmt::Display for BundleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Materialized => write!(f, "Materialized"),
            Self::Packaged => write!(f, "Packaged"),
            Self::Served => write!(f, "Served"),
            Self::Purged => write!(f, "Purged"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// A non-fatal condition observed while building a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildWarning {
    /// The blob contained no fenced blocks; the bundle is empty.
    EmptyInput,
    /// A segment matched no tag and no content heuristic.
    ClassificationAmbiguous { ordinal: usize },
    /// A base name was taken and a numeric suffix was appended.
    NamingCollision { base: String, resolved: String },
    /// A markup artifact had neither a head close nor a body start.
    Unlinked { name: String },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "input contained no fenced blocks"),
            Self::ClassificationAmbiguous { ordinal } => {
                write!(f, "block {ordinal} could not be classified")
            }
            Self::NamingCollision { base, resolved } => {
                write!(f, "name '{base}' already taken, used '{resolved}'")
            }
            Self::Unlinked { name } => {
                write!(f, "no head or body found in '{name}', stylesheets not linked")
            }
        }
    }
}

/// One file in a bundle manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub name: String,
    pub kind: ArtifactKind,
    pub bytes: usize,
    pub digest: String,
}

/// The complete set of artifacts produced from one generation request
#[derive(Debug, Clone)]
pub struct ProjectBundle {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub artifacts: Vec<Artifact>,
    pub workspace_path: PathBuf,
    pub archive_path: PathBuf,
    pub archive_digest: String,
    pub state: BundleState,
    pub warnings: Vec<BuildWarning>,
}

impl ProjectBundle {
    /// Ordered file list of the bundle, in artifact ordinal order
    pub fn manifest(&self) -> Vec<ManifestEntry> {
        self.artifacts
            .iter()
            .map(|artifact| ManifestEntry {
                name: artifact.name.clone(),
                kind: artifact.kind,
                bytes: artifact.content().len(),
                digest: hash::hash_bytes(artifact.content().as_bytes()),
            })
            .collect()
    }

    /// Whether the bundle holds no artifacts
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Look up an artifact by its resolved file name
    pub fn artifact(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.name == name)
    }
}
