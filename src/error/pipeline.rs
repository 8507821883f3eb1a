//! Pipeline errors

use super::SitepackError;

/// Creates a materialization failure for the workspace or file at `path`
pub fn materialization_failed(path: impl Into<String>, reason: impl Into<String>) -> SitepackError {
    SitepackError::MaterializationFailure {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a packaging failure for the archive at `path`
pub fn packaging_failed(path: impl Into<String>, reason: impl Into<String>) -> SitepackError {
    SitepackError::PackagingFailure {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an input unavailable error (the text source failed)
pub fn input_unavailable(reason: impl Into<String>) -> SitepackError {
    SitepackError::InputUnavailable {
        reason: reason.into(),
    }
}

/// Creates a background task failure
pub fn task_failed(reason: impl Into<String>) -> SitepackError {
    SitepackError::TaskFailed {
        reason: reason.into(),
    }
}
