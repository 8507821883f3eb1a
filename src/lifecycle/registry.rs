//! In-process bundle registry
//!
//! Every state change happens under one mutex, so two concurrent claims on
//! the same bundle cannot both observe `Packaged`, and the sweep cannot
//! purge a bundle a download has already claimed. File I/O (reading the
//! archive, removing the workspace) always happens outside the lock.
//!
//! Layout under the root:
//! ```text
//! <root>/<id>/       workspace
//! <root>/<id>.zip    archive
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant, SystemTime};

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ArchiveDownload;
use crate::domain::BundleState;
use crate::error::{Result, archive_read_failed, bundle_not_found, illegal_transition, io_error};

const ARCHIVE_EXTENSION: &str = "zip";

#[derive(Debug, Clone, Copy)]
struct Entry {
    state: BundleState,
    packaged_at: Option<Instant>,
    updated_at: Instant,
}

impl Entry {
    fn new(now: Instant) -> Self {
        Self {
            state: BundleState::Created,
            packaged_at: None,
            updated_at: now,
        }
    }

    fn expired(&self, ttl: Duration, now: Instant) -> bool {
        self.state == BundleState::Packaged
            && self
                .packaged_at
                .is_some_and(|at| now.saturating_duration_since(at) >= ttl)
    }

    fn forgettable(&self, ttl: Duration, now: Instant) -> bool {
        self.state.is_terminal() && now.saturating_duration_since(self.updated_at) >= ttl
    }
}

/// Thread-safe table of bundle states rooted at one directory
#[derive(Debug)]
pub struct BundleRegistry {
    root: PathBuf,
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl BundleRegistry {
    pub fn new(root: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            root: root.into(),
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Workspace directory of bundle `id`
    pub fn workspace_path(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Archive file of bundle `id`
    pub fn archive_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.{ARCHIVE_EXTENSION}"))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Allocate a fresh bundle id and register it as `Created`
    ///
    /// The id is unique among tracked bundles and among paths already
    /// present under the root.
    pub fn register(&self) -> String {
        let mut entries = self.lock();
        loop {
            let id = Uuid::new_v4().simple().to_string();
            if entries.contains_key(&id)
                || self.workspace_path(&id).exists()
                || self.archive_path(&id).exists()
            {
                continue;
            }
            entries.insert(id.clone(), Entry::new(Instant::now()));
            debug!(bundle = %id, "Registered bundle");
            return id;
        }
    }

    /// Current state of bundle `id`, if tracked
    pub fn state(&self, id: &str) -> Option<BundleState> {
        self.lock().get(id).map(|entry| entry.state)
    }

    /// Move bundle `id` to `to` along a legal edge
    pub fn advance(&self, id: &str, to: BundleState) -> Result<()> {
        let mut entries = self.lock();
        let entry = entries.get_mut(id).ok_or_else(|| bundle_not_found(id))?;
        Self::transition(id, entry, to, Instant::now())
    }

    fn transition(id: &str, entry: &mut Entry, to: BundleState, now: Instant) -> Result<()> {
        let from = entry.state;
        if !from.can_transition_to(to) {
            return Err(illegal_transition(from, to));
        }

        entry.state = to;
        entry.updated_at = now;
        if to == BundleState::Packaged {
            entry.packaged_at = Some(now);
        }
        debug!(bundle = %id, from = %from, to = %to, "Bundle transition");
        Ok(())
    }

    /// Mark bundle `id` as `Failed` and remove whatever it left on disk
    ///
    /// Terminal or unknown bundles are left alone.
    pub fn fail(&self, id: &str) {
        let marked = {
            let mut entries = self.lock();
            entries
                .get_mut(id)
                .map(|entry| Self::transition(id, entry, BundleState::Failed, Instant::now()))
        };

        match marked {
            Some(Ok(())) => {
                warn!(bundle = %id, "Bundle failed");
                self.remove_files(id);
            }
            Some(Err(e)) => debug!(bundle = %id, "Not marking bundle failed: {e}"),
            None => debug!(bundle = %id, "Not marking unknown bundle failed"),
        }
    }

    /// Claim the archive of bundle `id` for download
    ///
    /// Exactly one caller wins for a `Packaged` bundle; every other caller,
    /// and any caller for an unknown, served or purged bundle, gets
    /// `NotFound`. The winner receives the archive bytes and the bundle is
    /// purged before this returns, even when reading the archive fails.
    pub fn claim_download(&self, id: &str, file_name: &str) -> Result<ArchiveDownload> {
        {
            let mut entries = self.lock();
            let entry = entries
                .get_mut(id)
                .filter(|entry| entry.state == BundleState::Packaged)
                .ok_or_else(|| bundle_not_found(id))?;
            Self::transition(id, entry, BundleState::Served, Instant::now())?;
        }

        let read = fs::read(self.archive_path(id));
        self.remove_files(id);
        self.advance(id, BundleState::Purged)?;

        let bytes = read.map_err(|e| archive_read_failed(id, e.to_string()))?;
        info!(bundle = %id, bytes = bytes.len(), "Archive downloaded");
        Ok(ArchiveDownload {
            bundle_id: id.to_string(),
            file_name: file_name.to_string(),
            bytes,
        })
    }

    /// Purge every `Packaged` bundle whose TTL has elapsed at `now`
    ///
    /// Also forgets terminal bundles that have been terminal for a full TTL.
    /// Returns the ids purged by this pass.
    pub fn sweep_expired(&self, now: Instant) -> Vec<String> {
        let expired: Vec<String> = {
            let mut entries = self.lock();
            let ttl = self.ttl;
            entries.retain(|_, entry| !entry.forgettable(ttl, now));

            let mut expired = Vec::new();
            for (id, entry) in entries.iter_mut() {
                if entry.expired(ttl, now)
                    && Self::transition(id, entry, BundleState::Purged, now).is_ok()
                {
                    expired.push(id.clone());
                }
            }
            expired
        };

        for id in &expired {
            self.remove_files(id);
            info!(bundle = %id, "Expired bundle purged");
        }
        expired
    }

    /// Remove workspaces and archives under the root that no live bundle owns
    ///
    /// Leftovers from a previous process are the usual source. Only entries
    /// named like an issued bundle id are considered. A missing root is not
    /// an error.
    pub fn purge_untracked(&self) -> Result<Vec<PathBuf>> {
        self.remove_untracked(|_| true)
    }

    /// Remove untracked bundle entries last modified at least a TTL before `now`
    ///
    /// A bundle packaged by a process that has since exited is not in any
    /// registry, so this is the only sweep that reaches it.
    pub fn sweep_stale(&self, now: SystemTime) -> Result<Vec<PathBuf>> {
        let ttl = self.ttl;
        self.remove_untracked(|path| {
            fs::metadata(path)
                .and_then(|meta| meta.modified())
                .is_ok_and(|modified| now.duration_since(modified).is_ok_and(|age| age >= ttl))
        })
    }

    fn remove_untracked(&self, should_remove: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
        let listing = match fs::read_dir(&self.root) {
            Ok(listing) => listing,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(format!("{}: {e}", self.root.display()))),
        };

        let live: Vec<String> = self
            .lock()
            .iter()
            .filter(|(_, entry)| entry.state.is_live())
            .map(|(id, _)| id.clone())
            .collect();

        let mut removed = Vec::new();
        for dir_entry in listing {
            let path = dir_entry?.path();
            let Some(id) = bundle_id_of(&path) else {
                continue;
            };
            if live.iter().any(|live_id| live_id == id) || !should_remove(&path) {
                continue;
            }

            let result = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            match result {
                Ok(()) => removed.push(path),
                Err(e) => warn!(path = %path.display(), "Failed to remove untracked bundle: {e}"),
            }
        }

        if !removed.is_empty() {
            info!(count = removed.len(), "Removed untracked bundles");
        }
        Ok(removed)
    }

    /// Number of bundles that are not terminal
    pub fn live_count(&self) -> usize {
        self.lock()
            .values()
            .filter(|entry| entry.state.is_live())
            .count()
    }

    fn remove_files(&self, id: &str) {
        let workspace = self.workspace_path(id);
        if let Err(e) = fs::remove_dir_all(&workspace) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %workspace.display(), "Failed to remove workspace: {e}");
            }
        }

        let archive = self.archive_path(id);
        if let Err(e) = fs::remove_file(&archive) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %archive.display(), "Failed to remove archive: {e}");
            }
        }
    }
}

/// Bundle id a root entry belongs to: a directory name or an archive stem
///
/// Names that are not an id this registry would issue yield `None`, so
/// anything else sharing the root is left alone.
fn bundle_id_of(path: &Path) -> Option<&str> {
    let name = if path.is_dir() {
        path.file_name()?.to_str()?
    } else if path.extension()?.to_str()? == ARCHIVE_EXTENSION {
        path.file_stem()?.to_str()?
    } else {
        return None;
    };
    is_issued_id(name).then_some(name)
}

/// Issued ids are uuids in lowercase simple form
fn is_issued_id(name: &str) -> bool {
    Uuid::try_parse(name).is_ok_and(|id| id.simple().to_string() == name)
}
