//! Bundle lifecycle management
//!
//! Tracks every bundle from registration to removal. The registry is the
//! only owner of bundle state; the pipeline and the download path move
//! bundles through it and never touch the state table directly.
//!
//! Two cleanup paths exist:
//! - a download claims the archive exactly once, then purges the bundle
//! - the orphan sweep purges bundles packaged longer than the TTL ago

pub mod registry;

pub use registry::BundleRegistry;

/// Bytes of a claimed archive, ready to hand to the requester
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDownload {
    pub bundle_id: String,
    /// File name the archive is served under
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ArchiveDownload {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
