//! Tests for transaction support

use super::*;
use tempfile::TempDir;

#[test]
fn test_transaction_commit_keeps_files() {
    let temp = TempDir::new().unwrap();
    let test_file = temp.path().join("index.html");

    let mut transaction = Transaction::new();
    transaction.track_file_created(&test_file);
    fs::write(&test_file, "<html></html>").unwrap();
    transaction.commit();

    assert!(test_file.exists());
}

#[test]
fn test_transaction_rollback_created_files() {
    let temp = TempDir::new().unwrap();
    let test_file = temp.path().join("style.css");

    {
        let mut transaction = Transaction::new();
        transaction.track_file_created(&test_file);
        fs::write(&test_file, "a{}").unwrap();

        // Don't commit - should rollback on drop
    }

    assert!(!test_file.exists());
}

#[test]
fn test_transaction_rollback_removes_workspace_dir() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join("bundle-1");

    {
        let mut transaction = Transaction::new();
        fs::create_dir(&workspace).unwrap();
        transaction.track_dir_created(&workspace);
        transaction.track_file_created(workspace.join("a.css"));
        fs::write(workspace.join("a.css"), "a{}").unwrap();
        // Untracked stray file still goes with the directory
        fs::write(workspace.join("stray.txt"), "x").unwrap();
    }

    assert!(!workspace.exists());
    assert!(temp.path().exists());
}

#[test]
fn test_tracking_a_file_never_written_is_harmless() {
    let temp = TempDir::new().unwrap();
    {
        let mut transaction = Transaction::new();
        transaction.track_file_created(temp.path().join("never-written.js"));
    }
    assert!(temp.path().exists());
}
