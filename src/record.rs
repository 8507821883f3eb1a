//! Bundle records
//!
//! A record of every successful build (raw text plus manifest) can be kept
//! for auditing. Persistence is best-effort: callers log a failed write and
//! carry on, a bundle is never failed because its record was not saved.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::domain::{BuildWarning, ManifestEntry, ProjectBundle};
use crate::error::{Result, record_store_failed};

/// What is persisted for one bundle
#[derive(Debug, Clone, Serialize)]
pub struct BundleRecord {
    pub bundle_id: String,
    pub created_at: DateTime<Utc>,
    pub raw_text: String,
    pub archive_digest: String,
    pub manifest: Vec<ManifestEntry>,
    pub warnings: Vec<BuildWarning>,
}

impl BundleRecord {
    pub fn new(bundle: &ProjectBundle, raw_text: &str) -> Self {
        Self {
            bundle_id: bundle.id.clone(),
            created_at: bundle.created_at,
            raw_text: raw_text.to_string(),
            archive_digest: bundle.archive_digest.clone(),
            manifest: bundle.manifest(),
            warnings: bundle.warnings.clone(),
        }
    }
}

/// Where bundle records go
pub trait RecordStore: Send + Sync {
    fn persist(&self, record: &BundleRecord) -> Result<()>;
}

/// Discards every record
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecordStore;

impl RecordStore for NullRecordStore {
    fn persist(&self, _record: &BundleRecord) -> Result<()> {
        Ok(())
    }
}

/// Appends records as JSON lines to a file
#[derive(Debug)]
pub struct JsonlRecordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonlRecordStore {
    fn persist(&self, record: &BundleRecord) -> Result<()> {
        let fail = |reason: String| record_store_failed(self.path.display().to_string(), reason);

        let mut line = serde_json::to_string(record).map_err(|e| fail(e.to_string()))?;
        line.push('\n');

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| fail(e.to_string()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| fail(e.to_string()))?;
        file.write_all(line.as_bytes())
            .map_err(|e| fail(e.to_string()))?;

        debug!(bundle = %record.bundle_id, path = %self.path.display(), "Bundle record saved");
        Ok(())
    }
}
