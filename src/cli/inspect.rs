use clap::Parser;
use std::path::PathBuf;

/// Arguments for the inspect command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show planned files:\n    sitepack inspect answer.md\n\n\
                  Machine-readable manifest:\n    sitepack inspect answer.md --json")]
pub struct InspectArgs {
    /// File holding the generated text, or - for stdin
    pub input: PathBuf,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}
