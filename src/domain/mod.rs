//! Domain models for sitepack
//!
//! This module contains the plain data that flows through the pipeline:
//! segments cut from the raw blob, the artifacts derived from them, and the
//! bundle that owns those artifacts on disk.

pub mod artifact;
pub mod bundle;
pub mod segment;

pub use artifact::{Artifact, ArtifactKind};
pub use bundle::{BuildWarning, BundleState, ManifestEntry, ProjectBundle};
pub use segment::Segment;
