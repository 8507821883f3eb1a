//! File system errors

use super::SitepackError;

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> SitepackError {
    SitepackError::IoError {
        message: message.into(),
    }
}
