//! Test fixtures shared by unit tests.
//!
//! Builders for generated blobs and throwaway bundle roots.
//!
//! ```ignore
//! use crate::test_fixtures::{cafe_blob, create_temp_root, fenced};
//!
//! let blob = fenced("css", ".navbar { color: red; }");
//! let (_temp, root) = create_temp_root();
//! ```

use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use crate::config::SitepackConfig;

/// One fenced block with a declared tag
pub fn fenced(tag: &str, body: &str) -> String {
    format!("```{tag}\n{body}\n```\n")
}

/// Markup page titled "My Cafe" with a head section
pub const CAFE_HTML: &str = "<!DOCTYPE html>
<html>
<head>
    <title>My Cafe</title>
</head>
<body>
    <nav class=\"navbar\">Menu</nav>
</body>
</html>";

/// Stylesheet whose rules mention the navbar
pub const NAV_CSS: &str = ".navbar {
    background: #333;
    color: white;
}";

/// What a model typically returns for a one-page site with one stylesheet
pub fn cafe_blob() -> String {
    format!("{}{}", fenced("html", CAFE_HTML), fenced("css", NAV_CSS))
}

/// Fresh temp dir with a not-yet-created bundle root inside
pub fn create_temp_root() -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let root = temp.path().join("bundles");
    (temp, root)
}

/// Default config pointed at `root` with a short TTL
pub fn test_config(root: PathBuf) -> SitepackConfig {
    SitepackConfig {
        root,
        ttl: Duration::from_secs(60),
        sweep_interval: Duration::from_millis(20),
        ..SitepackConfig::default()
    }
}
