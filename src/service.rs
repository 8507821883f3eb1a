//! Async service facade
//!
//! Wraps a [`Packager`] for use from async code. The pure stages run on the
//! calling task; disk work runs on the blocking pool so a slow disk never
//! stalls the runtime. The orphan sweep runs as its own interval task.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SitepackConfig;
use crate::domain::ProjectBundle;
use crate::error::{Result, input_unavailable};
use crate::lifecycle::ArchiveDownload;
use crate::pipeline::{Packager, plan};

/// Something that yields the raw generated text for one build
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Fetch the raw text; failures map to `InputUnavailable`
    async fn fetch(&self) -> Result<String>;
}

/// Text held in memory
#[derive(Debug, Clone)]
pub struct StaticSource(pub String);

#[async_trait]
impl TextSource for StaticSource {
    async fn fetch(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Text read from a file, or from stdin for `-`
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }
}

#[async_trait]
impl TextSource for FileSource {
    async fn fetch(&self) -> Result<String> {
        if self.is_stdin() {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .map_err(|e| input_unavailable(format!("stdin: {e}")))?;
            return Ok(text);
        }

        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| input_unavailable(format!("{}: {e}", self.path.display())))
    }
}

/// Shareable handle to the packaging pipeline
#[derive(Clone)]
pub struct PackagingService {
    packager: Arc<Packager>,
    sweep_interval: Duration,
}

impl PackagingService {
    pub fn new(config: &SitepackConfig) -> Self {
        Self::with_packager(Packager::new(config), config.sweep_interval)
    }

    pub fn with_packager(packager: Packager, sweep_interval: Duration) -> Self {
        Self {
            packager: Arc::new(packager),
            sweep_interval,
        }
    }

    pub fn packager(&self) -> &Packager {
        &self.packager
    }

    /// Build and package a bundle from `raw`
    pub async fn build_bundle(&self, raw: String) -> Result<ProjectBundle> {
        let plan = plan(&raw);
        let packager = Arc::clone(&self.packager);
        tokio::task::spawn_blocking(move || packager.package(plan, &raw)).await?
    }

    /// Fetch text from `source`, then build from it
    pub async fn build_from(&self, source: &dyn TextSource) -> Result<ProjectBundle> {
        let raw = source.fetch().await?;
        self.build_bundle(raw).await
    }

    /// Claim the archive of bundle `id` exactly once
    pub async fn claim_download(&self, id: &str) -> Result<ArchiveDownload> {
        let packager = Arc::clone(&self.packager);
        let id = id.to_string();
        tokio::task::spawn_blocking(move || packager.claim_download(&id)).await?
    }

    /// Remove bundles an earlier process left under the root past their TTL
    pub async fn sweep_stale(&self) -> Result<Vec<PathBuf>> {
        let packager = Arc::clone(&self.packager);
        tokio::task::spawn_blocking(move || packager.sweep_stale(SystemTime::now())).await?
    }

    /// Start the orphan sweep; abort the handle to stop it
    ///
    /// Each tick purges expired bundles of this process and stale leftovers
    /// of earlier ones.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let packager = Arc::clone(&self.packager);
        let period = self.sweep_interval;
        info!(interval_ms = period.as_millis() as u64, "Starting orphan sweep");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let packager = Arc::clone(&packager);
                let swept = tokio::task::spawn_blocking(move || {
                    let stale = packager.sweep_stale(SystemTime::now()).unwrap_or_else(|e| {
                        warn!("Stale bundle sweep failed: {e}");
                        Vec::new()
                    });
                    (packager.sweep_expired(Instant::now()), stale)
                })
                .await;
                match swept {
                    Ok((purged, stale)) if !purged.is_empty() || !stale.is_empty() => {
                        debug!(
                            expired = purged.len(),
                            stale = stale.len(),
                            "Sweep purged bundles"
                        );
                    }
                    Ok(_) => {}
                    Err(e) => tracing::error!("Sweep task failed: {e}"),
                }
            }
        })
    }
}
