//! Build command
//!
//! Reads generated text, packages it and either leaves the bundle under the
//! root for a later download or, with `-o`, claims the download at once and
//! writes the archive (which purges the bundle). Bundles earlier runs left
//! past their TTL are swept first.

use std::path::PathBuf;

use console::Style;
use sitepack::config::SitepackConfig;
use sitepack::domain::{BuildWarning, ProjectBundle};
use sitepack::error::{Result, SitepackError, io_error, packaging_failed};
use sitepack::hash;
use sitepack::segmenter::segments;
use sitepack::service::{FileSource, PackagingService, TextSource};
use tracing::warn;

use super::helpers::{format_bytes, runtime};
use crate::cli::BuildArgs;
use crate::progress::ProgressDisplay;

/// Run the build command
pub fn run(config: SitepackConfig, args: BuildArgs) -> Result<()> {
    let progress = ProgressDisplay::new(console::user_attended_stderr());
    let result = runtime()?.block_on(build(&config, &args, &progress));
    match result {
        Ok(outcome) => {
            progress.finish();
            print_outcome(&outcome);
            Ok(())
        }
        Err(e) => {
            progress.abandon();
            Err(e)
        }
    }
}

struct Outcome {
    bundle: ProjectBundle,
    written: Option<(PathBuf, usize)>,
}

async fn build(
    config: &SitepackConfig,
    args: &BuildArgs,
    progress: &ProgressDisplay,
) -> Result<Outcome> {
    progress.stage("Reading input");
    let raw = FileSource::new(&args.input).fetch().await?;
    if !args.allow_empty && segments(&raw).next().is_none() {
        return Err(SitepackError::EmptyInput);
    }

    let service = PackagingService::new(config);
    if let Err(e) = service.sweep_stale().await {
        warn!("Failed to sweep expired bundles: {e}");
    }

    progress.stage("Packaging");
    let bundle = service.build_bundle(raw).await?;

    let Some(output) = &args.output else {
        return Ok(Outcome {
            bundle,
            written: None,
        });
    };

    progress.stage("Writing archive");
    let download = service.claim_download(&bundle.id).await?;
    if !hash::verify_hash(&bundle.archive_digest, &hash::hash_bytes(&download.bytes)) {
        return Err(packaging_failed(
            bundle.archive_path.display().to_string(),
            "archive changed between packaging and download",
        ));
    }
    let output = if output.is_dir() {
        output.join(&download.file_name)
    } else {
        output.clone()
    };
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_error(format!("{}: {e}", parent.display())))?;
    }
    tokio::fs::write(&output, &download.bytes)
        .await
        .map_err(|e| io_error(format!("{}: {e}", output.display())))?;

    Ok(Outcome {
        bundle,
        written: Some((output, download.len())),
    })
}

fn print_outcome(outcome: &Outcome) {
    let bundle = &outcome.bundle;
    let bold = Style::new().bold();

    println!(
        "{} {}",
        bold.apply_to("Bundle:"),
        Style::new().cyan().apply_to(&bundle.id)
    );
    print_manifest(bundle);
    println!("{} {}", bold.apply_to("Digest:"), bundle.archive_digest);

    match &outcome.written {
        Some((path, bytes)) => println!(
            "{} {} ({})",
            Style::new().green().bold().apply_to("Wrote"),
            path.display(),
            format_bytes(*bytes as u64)
        ),
        None => println!(
            "{} {}",
            bold.apply_to("Archive:"),
            bundle.archive_path.display()
        ),
    }

    print_warnings(&bundle.warnings);
}

fn print_manifest(bundle: &ProjectBundle) {
    let manifest = bundle.manifest();
    if manifest.is_empty() {
        println!("  (no files)");
        return;
    }

    let width = manifest.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in manifest {
        println!(
            "  {:<width$}  {:<10}  {}",
            Style::new().yellow().apply_to(&entry.name),
            entry.kind,
            format_bytes(entry.bytes as u64),
        );
    }
}

/// Warnings go to stderr so stdout stays a clean report
pub(crate) fn print_warnings(warnings: &[BuildWarning]) {
    let label = Style::new().yellow().bold();
    for warning in warnings {
        eprintln!("{} {}", label.apply_to("warning:"), warning);
    }
}
