//! Sitepack - package generated websites
//!
//! Command line front end: reads generated text, builds a bundle and writes
//! or reports the archive.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod progress;

use cli::{Cli, Commands};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Build(args) => commands::helpers::load_config(cli.config.as_deref(), cli.root)
            .and_then(|config| commands::build::run(config, args)),
        Commands::Clean => commands::helpers::load_config(cli.config.as_deref(), cli.root)
            .and_then(|config| commands::clean::run(&config)),
        Commands::Sweep => commands::helpers::load_config(cli.config.as_deref(), cli.root)
            .and_then(|config| commands::sweep::run(&config)),
    };

    if let Err(e) = result {
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(1);
    }
}
