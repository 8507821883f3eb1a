//! Integration tests for `sitepack build`, `sitepack clean` and `sitepack sweep`

mod common;

use std::fs::File;
use std::io::Read;
use std::thread::sleep;
use std::time::Duration;

use common::{TestRoot, fenced};
use predicates::prelude::*;
use serial_test::serial;

fn zip_names(path: &std::path::Path) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_build_with_output_writes_archive_and_purges() {
    let test = TestRoot::new();
    test.write_file("answer.md", &common::cafe_blob());

    test.cmd()
        .args(["build", "answer.md", "-o", "out/site.zip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("my-cafe.html"))
        .stdout(predicate::str::contains("Digest: blake3:"))
        .stdout(predicate::str::contains("Wrote"));

    let archive = test.path.join("out/site.zip");
    assert_eq!(
        zip_names(&archive),
        vec!["file-1.txt", "my-cafe.html", "nav.css"]
    );

    let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
    let mut html = String::new();
    zip.by_name("my-cafe.html")
        .unwrap()
        .read_to_string(&mut html)
        .unwrap();
    let link = html.find("<link rel=\"stylesheet\" href=\"nav.css\">").unwrap();
    assert!(link < html.find("</head>").unwrap());

    // Downloading purged the bundle from the root
    assert!(test.root_entries().is_empty());
}

#[test]
fn test_build_without_output_leaves_bundle_for_download() {
    let test = TestRoot::new();
    test.write_file("answer.md", &common::cafe_blob());

    test.cmd()
        .args(["build", "answer.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bundle:"))
        .stdout(predicate::str::contains("Archive:"));

    let entries = test.root_entries();
    assert_eq!(entries.len(), 2);
    let id = entries.iter().find(|e| !e.ends_with(".zip")).unwrap();
    assert!(entries.contains(&format!("{id}.zip")));
    assert!(test.root.join(id).join("nav.css").is_file());
}

#[test]
fn test_build_from_stdin() {
    let test = TestRoot::new();
    let blob = format!(
        "{}{}",
        fenced("html", "<html><head></head><body><div class=\"reservation-form\"></div></body></html>"),
        fenced("javascript", "document.addEventListener('DOMContentLoaded', () => {});")
    );

    test.cmd()
        .args(["build", "-", "-o", "site.zip"])
        .write_stdin(blob)
        .assert()
        .success();

    assert_eq!(
        zip_names(&test.path.join("site.zip")),
        vec!["main.js", "reservation.html"]
    );
}

#[test]
fn test_build_rejects_input_without_fences() {
    let test = TestRoot::new();
    test.write_file("answer.md", "I'm sorry, I can't build that website.");

    test.cmd()
        .args(["build", "answer.md", "-o", "site.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no fenced blocks"));

    assert!(!test.path.join("site.zip").exists());
    assert!(test.root_entries().is_empty());
}

#[test]
fn test_build_allow_empty_writes_empty_archive() {
    let test = TestRoot::new();
    test.write_file("answer.md", "nothing fenced here");

    test.cmd()
        .args(["build", "answer.md", "-o", "site.zip", "--allow-empty"])
        .assert()
        .success()
        .stderr(predicate::str::contains("no fenced blocks"));

    assert!(zip_names(&test.path.join("site.zip")).is_empty());
}

#[test]
fn test_build_missing_input() {
    let test = TestRoot::new();

    test.cmd()
        .args(["build", "missing.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unavailable"));
}

#[test]
fn test_build_reports_collisions() {
    let test = TestRoot::new();
    let blob = format!(
        "{}{}",
        fenced("css", "body { margin: 0; }"),
        fenced("css", "h2 { color: teal; }")
    );
    test.write_file("answer.md", &blob);

    test.cmd()
        .args(["build", "answer.md", "-o", "site.zip"])
        .assert()
        .success()
        .stderr(predicate::str::contains("style-2.css"));

    assert_eq!(
        zip_names(&test.path.join("site.zip")),
        vec!["style-2.css", "style.css"]
    );
}

#[test]
fn test_root_flag_overrides_environment() {
    let test = TestRoot::new();
    test.write_file("answer.md", &common::cafe_blob());
    let other_root = test.path.join("elsewhere");

    test.cmd()
        .args(["--root", "elsewhere", "build", "answer.md"])
        .assert()
        .success();

    assert!(test.root_entries().is_empty());
    assert_eq!(std::fs::read_dir(other_root).unwrap().count(), 2);
}

#[test]
fn test_output_directory_uses_configured_archive_name() {
    let test = TestRoot::new();
    test.write_file("sitepack.yaml", "archive_name: cafe.zip\ncompression_level: 1\n");
    test.write_file("answer.md", &common::cafe_blob());

    test.cmd()
        .args(["--config", "sitepack.yaml", "build", "answer.md", "-o", "."])
        .assert()
        .success();

    assert_eq!(
        zip_names(&test.path.join("cafe.zip")),
        vec!["file-1.txt", "my-cafe.html", "nav.css"]
    );
}

#[test]
#[serial]
fn test_clean_removes_leftover_bundles() {
    let test = TestRoot::new();
    test.write_file("answer.md", &common::cafe_blob());
    test.cmd().args(["build", "answer.md"]).assert().success();
    test.cmd().args(["build", "answer.md"]).assert().success();
    assert_eq!(test.root_entries().len(), 4);

    test.cmd()
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned"));

    assert!(test.root_entries().is_empty());

    test.cmd()
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to clean"));
}

fn issued_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[test]
#[serial]
fn test_clean_leaves_foreign_entries_alone() {
    let test = TestRoot::new();
    test.write_file("answer.md", &common::cafe_blob());
    test.write_file("bundles/.git/objects/info", "packs");
    test.write_file("bundles/photos/cat.jpg", "jpeg");
    test.write_file("bundles/backup.zip", "PK");
    test.cmd().args(["build", "answer.md"]).assert().success();

    test.cmd()
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned 2"));

    assert_eq!(test.root_entries(), vec![".git", "backup.zip", "photos"]);
    assert!(test.root.join(".git/objects/info").is_file());
    assert!(test.root.join("photos/cat.jpg").is_file());
}

#[test]
#[serial]
fn test_sweep_removes_only_expired_bundles() {
    let test = TestRoot::new();
    test.write_file("sitepack.yaml", "ttl_secs: 1\n");
    let old = issued_id();
    test.write_file(&format!("bundles/{old}/index.html"), "<html></html>");
    test.write_file(&format!("bundles/{old}.zip"), "PK");
    test.write_file("bundles/photos/cat.jpg", "jpeg");

    sleep(Duration::from_millis(1500));
    let fresh = issued_id();
    test.write_file(&format!("bundles/{fresh}/index.html"), "<html></html>");

    test.cmd()
        .args(["--config", "sitepack.yaml", "sweep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Swept 2"));

    let entries = test.root_entries();
    assert!(!entries.contains(&old));
    assert!(!entries.contains(&format!("{old}.zip")));
    assert!(entries.contains(&fresh));
    assert!(entries.contains(&"photos".to_string()));
}

#[test]
#[serial]
fn test_build_sweeps_bundles_left_by_earlier_runs() {
    let test = TestRoot::new();
    test.write_file("sitepack.yaml", "ttl_secs: 1\n");
    test.write_file("answer.md", &common::cafe_blob());

    test.cmd()
        .args(["--config", "sitepack.yaml", "build", "answer.md"])
        .assert()
        .success();
    let first = test.root_entries();
    assert_eq!(first.len(), 2);

    sleep(Duration::from_millis(1500));
    test.cmd()
        .args(["--config", "sitepack.yaml", "build", "answer.md"])
        .assert()
        .success();

    let second = test.root_entries();
    assert_eq!(second.len(), 2);
    assert!(first.iter().all(|entry| !second.contains(entry)));
}

#[test]
#[serial]
fn test_record_log_gets_one_line_per_build() {
    let test = TestRoot::new();
    test.write_file("sitepack.yaml", "record_log: records.jsonl\n");
    test.write_file("answer.md", &common::cafe_blob());

    test.cmd()
        .args(["--config", "sitepack.yaml", "build", "answer.md", "-o", "site.zip"])
        .assert()
        .success();

    let log = std::fs::read_to_string(test.path.join("records.jsonl")).unwrap();
    let record: serde_json::Value = serde_json::from_str(log.lines().next().unwrap()).unwrap();
    assert_eq!(record["manifest"][1]["name"], "my-cafe.html");
    assert!(
        record["archive_digest"]
            .as_str()
            .unwrap()
            .starts_with("blake3:")
    );
}
