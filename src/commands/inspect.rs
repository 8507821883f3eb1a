//! Inspect command: show what a build would produce

use console::Style;
use serde::Serialize;
use sitepack::domain::{ArtifactKind, BuildWarning};
use sitepack::error::{Result, io_error};
use sitepack::hash::hash_bytes;
use sitepack::pipeline::{Plan, plan};
use sitepack::service::{FileSource, TextSource};

use super::build::print_warnings;
use super::helpers::{format_bytes, runtime};
use crate::cli::InspectArgs;

#[derive(Debug, Serialize)]
struct PlannedFile<'a> {
    ordinal: usize,
    name: &'a str,
    kind: ArtifactKind,
    bytes: usize,
    digest: String,
    linked: bool,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    files: Vec<PlannedFile<'a>>,
    warnings: &'a [BuildWarning],
}

impl<'a> Report<'a> {
    fn new(plan: &'a Plan) -> Self {
        let files = plan
            .artifacts
            .iter()
            .map(|artifact| PlannedFile {
                ordinal: artifact.ordinal,
                name: &artifact.name,
                kind: artifact.kind,
                bytes: artifact.content().len(),
                digest: hash_bytes(artifact.content().as_bytes()),
                linked: artifact.is_linked(),
            })
            .collect();
        Self {
            files,
            warnings: &plan.warnings,
        }
    }
}

/// Run the inspect command
pub fn run(args: InspectArgs) -> Result<()> {
    let raw = runtime()?.block_on(FileSource::new(&args.input).fetch())?;
    let plan = plan(&raw);
    let report = Report::new(&plan);

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| io_error(e.to_string()))?;
        println!("{json}");
        return Ok(());
    }

    if report.files.is_empty() {
        println!("No files would be produced.");
    }
    for file in &report.files {
        let linked = if file.linked {
            Style::new().green().apply_to(" linked")
        } else {
            Style::new().apply_to("")
        };
        println!(
            "{:>3}  {}  {}  {}{}",
            file.ordinal,
            Style::new().yellow().apply_to(file.name),
            file.kind,
            format_bytes(file.bytes as u64),
            linked
        );
    }
    print_warnings(report.warnings);
    Ok(())
}
