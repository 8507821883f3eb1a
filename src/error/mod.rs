//! Error types and handling for sitepack
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`pipeline`]: materialization, packaging and input errors
//! - [`lifecycle`]: bundle state and download errors
//! - [`config`]: configuration errors
//! - [`store`]: record store errors
//! - [`fs`]: generic file system errors
//!
//! Only fatal conditions are errors. Ambiguous classification, naming
//! collisions, empty input and unlinkable markup are reported as
//! [`crate::domain::BuildWarning`]s on the bundle instead.

pub mod config;
pub mod fs;
pub mod lifecycle;
pub mod pipeline;
pub mod store;


pub use config::{
    invalid as config_invalid, parse_failed as config_parse_failed,
    read_failed as config_read_failed,
};
pub use fs::io_error;
pub use lifecycle::{
    archive_read_failed, illegal_transition, not_found as bundle_not_found,
};
pub use pipeline::{
    input_unavailable, materialization_failed, packaging_failed, task_failed,
};
pub use store::write_failed as record_store_failed;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for sitepack operations
#[derive(Error, Diagnostic, Debug)]
pub enum SitepackError {
    // Input errors
    #[error("Generated input contained no fenced blocks")]
    #[diagnostic(
        code(sitepack::input::empty),
        help("Fence each generated file with ``` followed by a language tag")
    )]
    EmptyInput,

    #[error("Generated input unavailable: {reason}")]
    #[diagnostic(code(sitepack::input::unavailable))]
    InputUnavailable { reason: String },

    // Pipeline errors
    #[error("Failed to materialize workspace at {path}: {reason}")]
    #[diagnostic(
        code(sitepack::pipeline::materialization_failed),
        help("Check that the bundle root is writable and has free space")
    )]
    MaterializationFailure { path: String, reason: String },

    #[error("Failed to build archive at {path}: {reason}")]
    #[diagnostic(
        code(sitepack::pipeline::packaging_failed),
        help("Check that the bundle root is writable and has free space")
    )]
    PackagingFailure { path: String, reason: String },

    #[error("Background task failed: {reason}")]
    #[diagnostic(code(sitepack::pipeline::task_failed))]
    TaskFailed { reason: String },

    // Lifecycle errors
    #[error("Bundle '{id}' not found")]
    #[diagnostic(
        code(sitepack::lifecycle::not_found),
        help("Bundles can be downloaded once and expire if never downloaded")
    )]
    NotFound { id: String },

    #[error("Illegal bundle state transition: {from} -> {to}")]
    #[diagnostic(code(sitepack::lifecycle::illegal_transition))]
    IllegalTransition { from: String, to: String },

    #[error("Failed to read archive for bundle '{id}': {reason}")]
    #[diagnostic(code(sitepack::lifecycle::archive_read_failed))]
    ArchiveReadFailed { id: String, reason: String },

    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(sitepack::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(sitepack::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(sitepack::config::invalid))]
    ConfigInvalid { message: String },

    // Record store errors
    #[error("Failed to persist bundle record to {path}: {reason}")]
    #[diagnostic(code(sitepack::store::write_failed))]
    RecordStoreFailed { path: String, reason: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(sitepack::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for SitepackError {
    fn from(err: std::io::Error) -> Self {
        SitepackError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for SitepackError {
    fn from(err: serde_yaml::Error) -> Self {
        SitepackError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SitepackError {
    fn from(err: serde_json::Error) -> Self {
        SitepackError::RecordStoreFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for SitepackError {
    fn from(err: tokio::task::JoinError) -> Self {
        task_failed(err.to_string())
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SitepackError>;
