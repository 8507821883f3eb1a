//! Sitepack - packaging for generated websites
//!
//! Turns the raw text a generative model returns (files wrapped in ```
//! fences) into a linked, flat project on disk and a single zip archive
//! that can be downloaded exactly once.
//!
//! The pipeline stages are plain modules that can be used on their own:
//! [`segmenter`], [`classifier`], [`naming`], [`linker`], [`materializer`]
//! and [`archive`]. [`pipeline::Packager`] ties them together with the
//! [`lifecycle`] registry, and [`service::PackagingService`] exposes the
//! whole thing to async callers.

pub mod archive;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod error;
pub mod hash;
pub mod lifecycle;
pub mod linker;
pub mod materializer;
pub mod naming;
pub mod pipeline;
pub mod record;
pub mod segmenter;
pub mod service;
pub mod transaction;

#[cfg(test)]
mod test_fixtures;
