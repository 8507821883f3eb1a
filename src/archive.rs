//! Archive building
//!
//! Streams every file of a workspace into one deflate-compressed zip. Entry
//! names are paths relative to the workspace with no directory prefix, so a
//! flat workspace yields a flat archive. A failure at any point, including
//! finalization, removes the partially written archive.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::FileOptions;

use crate::error::{Result, packaging_failed};
use crate::transaction::Transaction;

/// Highest deflate level
pub const MAX_COMPRESSION_LEVEL: i32 = 9;

/// What was written to the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub entries: usize,
    pub bytes: u64,
}

/// Build a zip of `workspace` at `archive_path`
///
/// The archive path must not exist yet. A compression level outside
/// `0..=9` is a packaging failure.
pub fn build_archive(
    workspace: &Path,
    archive_path: &Path,
    compression_level: i32,
) -> Result<ArchiveSummary> {
    let fail = |reason: String| packaging_failed(archive_path.display().to_string(), reason);

    let mut transaction = Transaction::new();
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(archive_path)
        .map_err(|e| fail(e.to_string()))?;
    transaction.track_file_created(archive_path);

    let entries = write_entries(workspace, file, compression_level).map_err(fail)?;
    let bytes = std::fs::metadata(archive_path)
        .map_err(|e| fail(e.to_string()))?
        .len();

    transaction.commit();
    info!(
        archive = %archive_path.display(),
        entries,
        bytes,
        "Archive created"
    );
    Ok(ArchiveSummary { entries, bytes })
}

fn write_entries(
    workspace: &Path,
    file: File,
    compression_level: i32,
) -> std::result::Result<usize, String> {
    if !(0..=MAX_COMPRESSION_LEVEL).contains(&compression_level) {
        return Err(format!(
            "compression level {compression_level} is outside 0..={MAX_COMPRESSION_LEVEL}"
        ));
    }

    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(compression_level))
        .unix_permissions(0o644);

    let mut writer = zip::ZipWriter::new(file);
    let mut entries = 0;

    for entry in WalkDir::new(workspace).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| e.to_string())?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry_name(workspace, entry.path())?;
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| e.to_string())?;
        let mut source = File::open(entry.path()).map_err(|e| e.to_string())?;
        io::copy(&mut source, &mut writer).map_err(|e| e.to_string())?;

        debug!(entry = %name, "Archived file");
        entries += 1;
    }

    let mut file = writer.finish().map_err(|e| e.to_string())?;
    file.flush().map_err(|e| e.to_string())?;
    file.sync_all().map_err(|e| e.to_string())?;
    Ok(entries)
}

/// Workspace-relative entry name using `/` separators
fn entry_name(workspace: &Path, path: &Path) -> std::result::Result<String, String> {
    let relative = path
        .strip_prefix(workspace)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    fn workspace_with(files: &[(&str, &str)]) -> (TempDir, std::path::PathBuf) {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().join("ws");
        std::fs::create_dir(&workspace).unwrap();
        for (name, content) in files {
            std::fs::write(workspace.join(name), content).unwrap();
        }
        (temp, workspace)
    }

    #[test]
    fn test_archive_is_flat_and_complete() {
        let (temp, workspace) = workspace_with(&[
            ("index.html", "<html></html>"),
            ("nav.css", ".navbar{color:red}"),
        ]);
        let archive_path = temp.path().join("ws.zip");

        let summary = build_archive(&workspace, &archive_path, MAX_COMPRESSION_LEVEL).unwrap();
        assert_eq!(summary.entries, 2);
        assert!(summary.bytes > 0);

        let mut zip = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        let mut names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["index.html", "nav.css"]);

        let mut css = String::new();
        zip.by_name("nav.css").unwrap().read_to_string(&mut css).unwrap();
        assert_eq!(css, ".navbar{color:red}");
    }

    #[test]
    fn test_empty_workspace_gives_empty_archive() {
        let (temp, workspace) = workspace_with(&[]);
        let archive_path = temp.path().join("ws.zip");

        let summary = build_archive(&workspace, &archive_path, 6).unwrap();
        assert_eq!(summary.entries, 0);
        assert!(archive_path.is_file());
    }

    #[test]
    fn test_missing_workspace_removes_partial_archive() {
        let temp = TempDir::new().unwrap();
        let archive_path = temp.path().join("gone.zip");

        let result = build_archive(&temp.path().join("missing"), &archive_path, 9);
        assert!(matches!(
            result,
            Err(crate::error::SitepackError::PackagingFailure { .. })
        ));
        assert!(!archive_path.exists());
    }

    #[test]
    fn test_out_of_range_level_removes_partial_archive() {
        let (temp, workspace) = workspace_with(&[("a.css", "a{}")]);
        let archive_path = temp.path().join("ws.zip");

        let result = build_archive(&workspace, &archive_path, 42);
        assert!(matches!(
            result,
            Err(crate::error::SitepackError::PackagingFailure { .. })
        ));
        assert!(!archive_path.exists());
    }

    #[test]
    fn test_existing_archive_is_not_clobbered() {
        let (temp, workspace) = workspace_with(&[("a.css", "a{}")]);
        let archive_path = temp.path().join("ws.zip");
        std::fs::write(&archive_path, "someone else's").unwrap();

        assert!(build_archive(&workspace, &archive_path, 9).is_err());
        assert_eq!(
            std::fs::read_to_string(&archive_path).unwrap(),
            "someone else's"
        );
    }
}
