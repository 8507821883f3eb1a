//! Common test utilities for sitepack integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Markup page whose title names the file
pub const CAFE_HTML: &str = "<!DOCTYPE html>
<html>
<head>
    <title>My Cafe</title>
</head>
<body>
    <nav class=\"navbar\">Menu</nav>
</body>
</html>";

/// Stylesheet named after its navbar rules
pub const NAV_CSS: &str = ".navbar {
    background: #333;
}";

/// One fenced block with a declared tag
pub fn fenced(tag: &str, body: &str) -> String {
    format!("```{tag}\n{body}\n```\n")
}

/// A two-file answer as a model would return it
pub fn cafe_blob() -> String {
    format!(
        "Here is your site.\n\n{}\n{}",
        fenced("html", CAFE_HTML),
        fenced("css", NAV_CSS)
    )
}

/// A scratch working directory with its own bundle root
pub struct TestRoot {
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Working directory for the binary
    pub path: PathBuf,
    /// Bundle root passed through `SITEPACK_ROOT`
    pub root: PathBuf,
}

impl TestRoot {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        let root = path.join("bundles");
        Self { temp, path, root }
    }

    #[allow(dead_code)]
    /// Write a file relative to the working directory
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Names of everything directly under the bundle root
    #[allow(dead_code)]
    pub fn root_entries(&self) -> Vec<String> {
        let Ok(listing) = std::fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut names: Vec<String> = listing
            .map(|entry| {
                entry
                    .expect("Failed to read root entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }

    /// The sitepack binary, run inside this directory against this root
    #[allow(dead_code, deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("sitepack").expect("sitepack binary should build");
        cmd.current_dir(&self.path)
            .env("SITEPACK_ROOT", &self.root)
            .env("RUST_LOG", "warn")
            .env_remove("SITEPACK_CONFIG");
        cmd
    }
}
