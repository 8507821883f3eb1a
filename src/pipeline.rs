//! The build pipeline
//!
//! ```text
//! raw text → segments → classify → name → link → materialize → archive
//! ```
//!
//! Everything up to linking is pure and lives in [`plan`]. [`Packager`]
//! takes a plan to disk under a freshly registered bundle id; either the
//! bundle reaches `Packaged` with its workspace and archive in place, or it
//! ends `Failed` with nothing left on disk.

use std::path::PathBuf;
use std::time::{Instant, SystemTime};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::archive::build_archive;
use crate::classifier::classify;
use crate::config::SitepackConfig;
use crate::domain::{Artifact, BuildWarning, BundleState, ProjectBundle};
use crate::error::Result;
use crate::hash;
use crate::lifecycle::{ArchiveDownload, BundleRegistry};
use crate::linker::link_stylesheets;
use crate::materializer::materialize;
use crate::naming::NamingContext;
use crate::record::{BundleRecord, JsonlRecordStore, NullRecordStore, RecordStore};
use crate::segmenter::segments;

/// Artifacts a blob would produce, before anything touches disk
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub artifacts: Vec<Artifact>,
    pub warnings: Vec<BuildWarning>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

/// Segment, classify, name and link `raw` without side effects
pub fn plan(raw: &str) -> Plan {
    let mut naming = NamingContext::new();
    let mut warnings = Vec::new();
    let mut artifacts = Vec::new();

    for segment in segments(raw) {
        let classification = classify(&segment);
        if classification.is_ambiguous() {
            debug!(ordinal = segment.ordinal, "Block could not be classified");
            warnings.push(BuildWarning::ClassificationAmbiguous {
                ordinal: segment.ordinal,
            });
        }

        let resolved = naming.resolve(classification.kind, &segment.raw_content);
        if resolved.collided {
            warnings.push(BuildWarning::NamingCollision {
                base: resolved.base.clone(),
                resolved: resolved.file_name.clone(),
            });
        }

        debug!(
            ordinal = segment.ordinal,
            kind = %classification.kind,
            name = %resolved.file_name,
            "Planned artifact"
        );
        artifacts.push(Artifact::new(
            segment.ordinal,
            classification.kind,
            resolved.file_name,
            segment.raw_content,
        ));
    }

    if artifacts.is_empty() {
        warnings.insert(0, BuildWarning::EmptyInput);
    }
    warnings.extend(link_stylesheets(&mut artifacts));

    Plan {
        artifacts,
        warnings,
    }
}

/// Takes plans to disk and serves the resulting archives
pub struct Packager {
    registry: BundleRegistry,
    compression_level: i32,
    archive_name: String,
    records: Box<dyn RecordStore>,
}

impl Packager {
    pub fn new(config: &SitepackConfig) -> Self {
        let records: Box<dyn RecordStore> = match &config.record_log {
            Some(path) => Box::new(JsonlRecordStore::new(path)),
            None => Box::new(NullRecordStore),
        };
        Self {
            registry: BundleRegistry::new(&config.root, config.ttl),
            compression_level: config.compression_level,
            archive_name: config.archive_name.clone(),
            records,
        }
    }

    /// Replace the record store
    pub fn with_record_store(mut self, records: Box<dyn RecordStore>) -> Self {
        self.records = records;
        self
    }

    pub fn registry(&self) -> &BundleRegistry {
        &self.registry
    }

    /// File name downloads are served under
    pub fn archive_name(&self) -> &str {
        &self.archive_name
    }

    /// Run the whole pipeline on `raw`
    pub fn build_bundle(&self, raw: &str) -> Result<ProjectBundle> {
        self.package(plan(raw), raw)
    }

    /// Materialize and archive a plan under a new bundle id
    pub fn package(&self, plan: Plan, raw: &str) -> Result<ProjectBundle> {
        let started = Instant::now();
        let id = self.registry.register();
        let created_at = Utc::now();

        let archive_digest = match self.write_bundle(&id, &plan.artifacts) {
            Ok(digest) => digest,
            Err(e) => {
                self.registry.fail(&id);
                return Err(e);
            }
        };

        let bundle = ProjectBundle {
            workspace_path: self.registry.workspace_path(&id),
            archive_path: self.registry.archive_path(&id),
            id,
            created_at,
            artifacts: plan.artifacts,
            archive_digest,
            state: BundleState::Packaged,
            warnings: plan.warnings,
        };

        if let Err(e) = self.records.persist(&BundleRecord::new(&bundle, raw)) {
            warn!(bundle = %bundle.id, "Failed to save bundle record: {e}");
        }

        info!(
            bundle = %bundle.id,
            artifacts = bundle.artifacts.len(),
            warnings = bundle.warnings.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Bundle packaged"
        );
        Ok(bundle)
    }

    fn write_bundle(&self, id: &str, artifacts: &[Artifact]) -> Result<String> {
        let workspace = self.registry.workspace_path(id);
        let archive = self.registry.archive_path(id);

        materialize(&workspace, artifacts)?;
        self.registry.advance(id, BundleState::Materialized)?;

        build_archive(&workspace, &archive, self.compression_level)?;
        let digest = hash::hash_file(&archive)?;
        self.registry.advance(id, BundleState::Packaged)?;
        Ok(digest)
    }

    /// Claim the archive of bundle `id`; see [`BundleRegistry::claim_download`]
    pub fn claim_download(&self, id: &str) -> Result<ArchiveDownload> {
        self.registry.claim_download(id, &self.archive_name)
    }

    /// Purge packaged bundles whose TTL has elapsed at `now`
    pub fn sweep_expired(&self, now: Instant) -> Vec<String> {
        self.registry.sweep_expired(now)
    }

    /// Remove bundles an earlier process left under the root past their TTL
    pub fn sweep_stale(&self, now: SystemTime) -> Result<Vec<PathBuf>> {
        self.registry.sweep_stale(now)
    }
}
