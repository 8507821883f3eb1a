//! Command implementations for the sitepack CLI

pub mod build;
pub mod clean;
pub mod completions;
pub mod helpers;
pub mod inspect;
pub mod sweep;
pub mod version;
