//! Bundle lifecycle errors

use super::SitepackError;

/// Creates a bundle not found error
pub fn not_found(id: impl Into<String>) -> SitepackError {
    SitepackError::NotFound { id: id.into() }
}

/// Creates an illegal transition error
pub fn illegal_transition(from: impl ToString, to: impl ToString) -> SitepackError {
    SitepackError::IllegalTransition {
        from: from.to_string(),
        to: to.to_string(),
    }
}

/// Creates an archive read failure for a claimed bundle
pub fn archive_read_failed(id: impl Into<String>, reason: impl Into<String>) -> SitepackError {
    SitepackError::ArchiveReadFailed {
        id: id.into(),
        reason: reason.into(),
    }
}
