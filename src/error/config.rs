//! Configuration errors

use super::SitepackError;

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> SitepackError {
    SitepackError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> SitepackError {
    SitepackError::ConfigInvalid {
        message: message.into(),
    }
}

/// Creates a config read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> SitepackError {
    SitepackError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
