//! Project materialization
//!
//! Writes a bundle's artifacts as flat files into a fresh workspace
//! directory named after the bundle id. Stylesheets are written first, then
//! markup, then everything else, each group in ordinal order. Any failure
//! removes the whole workspace before the error is returned.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::Artifact;
use crate::error::{Result, materialization_failed};
use crate::transaction::Transaction;

/// Write `artifacts` into the new directory `workspace`
///
/// The workspace must not exist yet; bundles never share a workspace.
/// Returns the written paths in write order.
pub fn materialize(workspace: &Path, artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
    if let Some(root) = workspace.parent() {
        fs::create_dir_all(root)
            .map_err(|e| materialization_failed(root.display().to_string(), e.to_string()))?;
    }

    let mut transaction = Transaction::new();
    fs::create_dir(workspace)
        .map_err(|e| materialization_failed(workspace.display().to_string(), e.to_string()))?;
    transaction.track_dir_created(workspace);

    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in write_order(artifacts) {
        let path = workspace.join(&artifact.name);
        validate_file_name(&artifact.name)
            .map_err(|reason| materialization_failed(path.display().to_string(), reason))?;

        transaction.track_file_created(&path);
        fs::write(&path, artifact.content())
            .map_err(|e| materialization_failed(path.display().to_string(), e.to_string()))?;

        debug!(file = %artifact.name, kind = %artifact.kind, "Materialized artifact");
        written.push(path);
    }

    transaction.commit();
    Ok(written)
}

/// Artifacts in write order: stylesheets, markup, then the rest
pub fn write_order(artifacts: &[Artifact]) -> Vec<&Artifact> {
    let mut ordered: Vec<&Artifact> = artifacts.iter().collect();
    ordered.sort_by_key(|a| (a.kind.write_rank(), a.ordinal));
    ordered
}

/// Artifact names must be plain file names inside the workspace.
fn validate_file_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("empty file name".to_string());
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(format!("'{name}' is not a plain file name"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArtifactKind;
    use tempfile::TempDir;

    fn artifact(ordinal: usize, kind: ArtifactKind, name: &str) -> Artifact {
        Artifact::new(ordinal, kind, name, format!("content of {name}"))
    }

    #[test]
    fn test_materialize_writes_flat_files() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().join("bundle-1");
        let artifacts = vec![
            artifact(0, ArtifactKind::Markup, "index.html"),
            artifact(1, ArtifactKind::Stylesheet, "style.css"),
        ];

        let written = materialize(&workspace, &artifacts).unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(
            fs::read_to_string(workspace.join("index.html")).unwrap(),
            "content of index.html"
        );
        assert!(workspace.join("style.css").is_file());
    }

    #[test]
    fn test_write_order_stylesheets_then_markup_then_rest() {
        let artifacts = vec![
            artifact(0, ArtifactKind::Script, "script.js"),
            artifact(1, ArtifactKind::Markup, "index.html"),
            artifact(2, ArtifactKind::Stylesheet, "b.css"),
            artifact(3, ArtifactKind::Unknown, "file-1.txt"),
            artifact(4, ArtifactKind::Stylesheet, "a.css"),
        ];

        let names: Vec<_> = write_order(&artifacts).iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["b.css", "a.css", "index.html", "script.js", "file-1.txt"]
        );
    }

    #[test]
    fn test_existing_workspace_is_rejected() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().join("taken");
        fs::create_dir(&workspace).unwrap();

        let result = materialize(&workspace, &[artifact(0, ArtifactKind::Markup, "index.html")]);
        assert!(matches!(
            result,
            Err(crate::error::SitepackError::MaterializationFailure { .. })
        ));
        // The pre-existing directory belongs to someone else and stays
        assert!(workspace.exists());
    }

    #[test]
    fn test_failure_removes_partial_workspace() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().join("bundle-2");
        let artifacts = vec![
            artifact(0, ArtifactKind::Stylesheet, "style.css"),
            artifact(1, ArtifactKind::Markup, "nested/index.html"),
        ];

        let result = materialize(&workspace, &artifacts);

        assert!(matches!(
            result,
            Err(crate::error::SitepackError::MaterializationFailure { .. })
        ));
        assert!(!workspace.exists());
    }

    #[test]
    fn test_empty_bundle_creates_empty_workspace() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().join("empty");
        let written = materialize(&workspace, &[]).unwrap();
        assert!(written.is_empty());
        assert!(workspace.is_dir());
    }
}
