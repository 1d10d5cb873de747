//! Console rendering of driver results.

use std::error::Error;
use std::fmt::Write as _;
use std::path::PathBuf;

use owo_colors::{OwoColorize, Stream};

use crate::driver::{FileOutcome, FileReport, RunSummary};

#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// `error` followed by each of its sources, `: `-separated.
pub fn error_chain(error: &dyn Error) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(err) = source {
        let _ = write!(out, ": {err}");
        source = err.source();
    }
    out
}

/// Discovered files, a header line then one `  - path` line each.
pub fn candidates(files: &[PathBuf]) -> String {
    let mut out = format!(
        "{} found {} file{} with animated components",
        "[deanimate]".if_supports_color(Stream::Stdout, |t| t.bright_yellow()),
        files.len(),
        plural_s(files.len()),
    );
    for file in files {
        let _ = write!(out, "\n  - {}", file.display());
    }
    out
}

/// One line per file.
pub fn file_line(report: &FileReport, dry_run: bool) -> String {
    let path = report.path.display();
    match &report.outcome {
        FileOutcome::Unchanged => format!(
            "{} {path}",
            "unchanged".if_supports_color(Stream::Stdout, |t| t.dimmed())
        ),
        FileOutcome::Changed => {
            let label = if dry_run { "would change" } else { "changed" };
            format!(
                "{} {path}",
                label.if_supports_color(Stream::Stdout, |t| t.bright_green())
            )
        }
        FileOutcome::Failed(err) => format!(
            "{} {}",
            "error".if_supports_color(Stream::Stdout, |t| t.bright_red()),
            error_chain(err)
        ),
    }
}

pub fn summary_line(summary: &RunSummary, dry_run: bool) -> String {
    let examined = summary.examined();
    let changed = summary.changed();
    let failed = summary.failed();
    let verb = if dry_run { "would change" } else { "changed" };
    let mut line = format!(
        "{} examined {examined} file{}, {verb} {changed}",
        "[deanimate]".if_supports_color(Stream::Stdout, |t| t.bright_yellow()),
        plural_s(examined),
    );
    if failed > 0 {
        let _ = write!(line, ", {failed} failed");
    }
    line
}
