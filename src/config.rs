//! Runtime configuration
//!
//! Loaded from an optional YAML file; every key has a default:
//!
//! ```yaml
//! root: /var/lib/sitepack/bundles
//! ttl_secs: 1800
//! sweep_interval_secs: 60
//! compression_level: 9
//! archive_name: website.zip
//! record_log: /var/log/sitepack/records.jsonl
//! ```
//!
//! The bundle root can be overridden with the `SITEPACK_ROOT` environment
//! variable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::archive::MAX_COMPRESSION_LEVEL;
use crate::error::{Result, config_invalid, config_parse_failed, config_read_failed};

/// Environment variable overriding the bundle root
pub const ROOT_ENV: &str = "SITEPACK_ROOT";

const APP_DIR: &str = "sitepack";
const BUNDLES_DIR: &str = "bundles";

pub const DEFAULT_TTL_SECS: u64 = 30 * 60;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 9;
pub const DEFAULT_ARCHIVE_NAME: &str = "website.zip";

/// On-disk shape of the config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    root: Option<PathBuf>,
    #[serde(default)]
    ttl_secs: Option<u64>,
    #[serde(default)]
    sweep_interval_secs: Option<u64>,
    #[serde(default)]
    compression_level: Option<i32>,
    #[serde(default)]
    archive_name: Option<String>,
    #[serde(default)]
    record_log: Option<PathBuf>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitepackConfig {
    /// Directory holding bundle workspaces and archives
    pub root: PathBuf,
    /// How long a packaged bundle waits for its download
    pub ttl: Duration,
    /// How often the orphan sweep runs
    pub sweep_interval: Duration,
    pub compression_level: i32,
    /// File name a downloaded archive is served under
    pub archive_name: String,
    /// JSON lines file for bundle records, if any
    pub record_log: Option<PathBuf>,
}

impl Default for SitepackConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            record_log: None,
        }
    }
}

impl SitepackConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw: RawConfig = if yaml.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        let defaults = Self::default();

        let config = Self {
            root: raw.root.unwrap_or(defaults.root),
            ttl: raw.ttl_secs.map(Duration::from_secs).unwrap_or(defaults.ttl),
            sweep_interval: raw
                .sweep_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
            compression_level: raw.compression_level.unwrap_or(defaults.compression_level),
            archive_name: raw.archive_name.unwrap_or(defaults.archive_name),
            record_log: raw.record_log,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`
    pub fn from_file(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| config_read_failed(display.clone(), e.to_string()))?;
        Self::from_yaml(&yaml).map_err(|e| match e {
            crate::error::SitepackError::ConfigParseFailed { reason, .. } => {
                config_parse_failed(display, reason)
            }
            other => other,
        })
    }

    /// Load from `path` if given, else defaults; then apply the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Ok(root) = std::env::var(ROOT_ENV) {
            if !root.is_empty() {
                config.root = PathBuf::from(root);
            }
        }
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.ttl.is_zero() {
            return Err(config_invalid("ttl_secs must be greater than zero"));
        }
        if self.sweep_interval.is_zero() {
            return Err(config_invalid("sweep_interval_secs must be greater than zero"));
        }
        if !(0..=MAX_COMPRESSION_LEVEL).contains(&self.compression_level) {
            return Err(config_invalid(format!(
                "compression_level must be between 0 and {MAX_COMPRESSION_LEVEL}, got {}",
                self.compression_level
            )));
        }
        if self.archive_name.trim().is_empty() {
            return Err(config_invalid("archive_name cannot be empty"));
        }
        if self.archive_name.contains(['/', '\\']) {
            return Err(config_invalid(format!(
                "archive_name '{}' must be a plain file name",
                self.archive_name
            )));
        }
        Ok(())
    }
}

/// Platform cache dir plus `sitepack/bundles`, else the system temp dir
pub fn default_root() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);
    base.join(APP_DIR).join(BUNDLES_DIR)
}
