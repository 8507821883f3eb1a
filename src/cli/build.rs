use clap::Parser;
use std::path::PathBuf;

/// Arguments for the build command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Build from a saved answer into website.zip:\n    sitepack build answer.md -o website.zip\n\n\
                  Keep the bundle under the root until it expires:\n    sitepack build answer.md\n\n\
                  Build from stdin into a chosen file:\n    sitepack build - -o cafe.zip < answer.md\n\n\
                  Accept answers without any fenced block:\n    sitepack build answer.md --allow-empty")]
pub struct BuildArgs {
    /// File holding the generated text, or - for stdin
    pub input: PathBuf,

    /// Claim the download and write the archive here; a directory gets the configured archive name
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Write an empty archive instead of failing when no fenced block is found
    #[arg(long)]
    pub allow_empty: bool,
}
