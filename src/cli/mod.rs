//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - build: Build command arguments
//! - inspect: Inspect command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod build;
pub mod completions;
pub mod inspect;

pub use build::BuildArgs;
pub use completions::CompletionsArgs;
pub use inspect::InspectArgs;

/// Sitepack - package generated websites
///
/// Split a model's fenced answer into files, link them, and zip them up.
#[derive(Parser, Debug)]
#[command(
    name = "sitepack",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Package generated website text into a downloadable zip",
    long_about = "Sitepack splits generated text on ``` fences, classifies each block as \
                  markup, stylesheet or script, names the files, links stylesheets into \
                  every page and packages the result as a single zip archive.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  sitepack build answer.md -o website.zip  \x1b[90m# Write website.zip\x1b[0m\n   \
                  sitepack build answer.md                 \x1b[90m# Keep the bundle under the root\x1b[0m\n   \
                  sitepack build - -o site.zip < answer.md \x1b[90m# Read from stdin\x1b[0m\n   \
                  sitepack inspect answer.md               \x1b[90m# Show the planned files\x1b[0m\n   \
                  sitepack sweep                           \x1b[90m# Remove bundles older than the TTL\x1b[0m\n   \
                  sitepack clean                           \x1b[90m# Remove every leftover bundle\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(long, short = 'c', global = true, env = "SITEPACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bundle root directory (overrides config and SITEPACK_ROOT)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a website archive from generated text
    Build(BuildArgs),

    /// Show the files a build would produce, without writing anything
    Inspect(InspectArgs),

    /// Remove leftover workspaces and archives from the bundle root
    Clean,

    /// Remove leftover bundles older than the configured TTL
    Sweep,

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
