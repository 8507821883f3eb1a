//! Command helper utilities

use std::path::{Path, PathBuf};

use sitepack::config::SitepackConfig;
use sitepack::error::{Result, io_error};

/// Load configuration, then let `--root` win over file and environment
pub fn load_config(config: Option<&Path>, root: Option<PathBuf>) -> Result<SitepackConfig> {
    let mut config = SitepackConfig::load(config)?;
    if let Some(root) = root {
        config.root = root;
    }
    Ok(config)
}

/// Single-threaded runtime for one command
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| io_error(format!("Failed to start async runtime: {e}")))
}

/// Human-readable byte size
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}
