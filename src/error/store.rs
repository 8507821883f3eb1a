//! Record store errors

use super::SitepackError;

/// Creates a record store write failure
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> SitepackError {
    SitepackError::RecordStoreFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
