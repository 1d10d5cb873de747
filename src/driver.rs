//! Per-file read, transform, write.
//!
//! Every failure stays inside the file it happened in: a run always visits
//! every candidate and ends with one [`FileReport`] per file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::pipeline::Pipeline;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read `{}`", .0.display())]
    Read(PathBuf, #[source] io::Error),

    #[error("failed to write `{}`", .0.display())]
    Write(PathBuf, #[source] io::Error),
}

#[derive(Debug)]
pub enum FileOutcome {
    /// No animated markup matched.
    Unchanged,
    /// Rewritten (or, in a dry run, would have been).
    Changed,
    Failed(FileError),
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<FileReport>,
}

impl RunSummary {
    pub fn examined(&self) -> usize {
        self.reports.len()
    }

    pub fn changed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Changed))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Persists rewritten text. The driver's only mutation point.
pub type WriteFn = fn(&Path, &str) -> io::Result<()>;

fn write_file(path: &Path, text: &str) -> io::Result<()> {
    fs::write(path, text)
}

pub struct Driver<'p> {
    pipeline: &'p Pipeline,
    dry_run: bool,
    write: WriteFn,
}

impl<'p> Driver<'p> {
    pub fn new(pipeline: &'p Pipeline) -> Self {
        Self {
            pipeline,
            dry_run: false,
            write: write_file,
        }
    }

    /// Replace how rewritten files are persisted.
    pub fn with_writer(mut self, write: WriteFn) -> Self {
        self.write = write;
        self
    }

    /// Report changes without writing them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn process(&self, path: &Path) -> FileReport {
        let outcome = match self.rewrite(path) {
            Ok(true) => FileOutcome::Changed,
            Ok(false) => FileOutcome::Unchanged,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "file skipped");
                FileOutcome::Failed(err)
            }
        };
        FileReport {
            path: path.to_path_buf(),
            outcome,
        }
    }

    fn rewrite(&self, path: &Path) -> Result<bool, FileError> {
        let src = fs::read_to_string(path).map_err(|e| FileError::Read(path.to_path_buf(), e))?;
        let result = self.pipeline.transform(&src);
        if !result.changed {
            debug!(path = %path.display(), "no animated markup");
            return Ok(false);
        }
        if self.dry_run {
            debug!(path = %path.display(), "dry run, not writing");
        } else {
            (self.write)(path, &result.text)
                .map_err(|e| FileError::Write(path.to_path_buf(), e))?;
            debug!(path = %path.display(), "rewritten");
        }
        Ok(true)
    }

    /// Process `paths` one after another, handing each report to `on_report`
    /// as soon as it is ready.
    pub fn run<I>(&self, paths: I, mut on_report: impl FnMut(&FileReport)) -> RunSummary
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        let mut summary = RunSummary::default();
        for path in paths {
            let report = self.process(path.as_ref());
            on_report(&report);
            summary.reports.push(report);
        }
        summary
    }
}
