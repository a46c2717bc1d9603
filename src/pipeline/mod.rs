//! Per-file processing pipeline.
//!
//! A [`FilePipeline`] is a plan: building it performs no I/O and consumes no
//! input. Input is read only when the plan is driven through
//! [`FilePipeline::outcomes`] or [`FilePipeline::run`], so the same plan can
//! be run repeatedly or re-limited with [`FilePipeline::with_row_limit`].

#[cfg(test)]
mod tests;

use crate::config::PipelineOptions;
use crate::error::Result;
use crate::models::{FileSummary, LineTally, LogEventRecord, ParseOutcome, ReadingRecord, Record};
use crate::parser::{LineParser, LineSource, Lines};

use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Lazily evaluated source → classify → extract → normalize → validate plan
#[derive(Debug, Clone)]
pub struct FilePipeline {
    path: PathBuf,
    parser: LineParser,
    options: PipelineOptions,
    cancellation: Option<CancellationToken>,
}

impl FilePipeline {
    /// Build a pipeline for `path`; does not touch the file
    pub fn new(path: impl Into<PathBuf>, options: PipelineOptions) -> Result<Self> {
        let parser = LineParser::with_strategy(options.split_strategy)?;
        Ok(Self::with_parser(path, parser, options))
    }

    /// Build a pipeline around an already compiled parser
    pub fn with_parser(path: impl Into<PathBuf>, parser: LineParser, options: PipelineOptions) -> Self {
        Self {
            path: path.into(),
            parser,
            options,
            cancellation: None,
        }
    }

    /// Same plan with a different row limit
    pub fn with_row_limit(&self, row_limit: usize) -> Self {
        Self {
            options: self.options.with_row_limit(row_limit),
            ..self.clone()
        }
    }

    /// Stop pulling lines once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Open the file and stream per-line outcomes, noise already dropped.
    ///
    /// Returns the source error unchanged, including
    /// [`crate::FhemError::EmptyInput`], so callers decide how to treat it.
    pub fn outcomes(&self) -> Result<Outcomes<'_>> {
        let source = LineSource::open(&self.path)?;
        debug!(
            "Opened {} ({} bytes)",
            self.path.display(),
            source.byte_len()
        );

        Ok(Outcomes {
            lines: source.lines()?,
            parser: &self.parser,
            cancellation: self.cancellation.as_ref(),
            tally: LineTally::new(),
        })
    }

    /// Drive the pipeline to completion or to its row limit.
    ///
    /// A zero-byte file yields an empty output; only an unreadable file is
    /// an error.
    pub fn run(&self) -> Result<FileOutput> {
        let mut outcomes = match self.outcomes() {
            Ok(outcomes) => outcomes,
            Err(e) if e.is_empty_input() => {
                debug!("Empty file, no records: {}", self.path.display());
                return Ok(FileOutput::empty(self.path.clone()));
            }
            Err(e) => return Err(e),
        };

        let limit = self.options.effective_limit();
        let mut records = Vec::new();
        let mut summary = FileSummary::new();

        while limit.is_none_or(|limit| records.len() < limit) {
            let Some(outcome) = outcomes.next() else {
                break;
            };

            if let ParseOutcome::Accepted(record) = outcome {
                summary.observe(record.timestamp());
                records.push(record);
            }
        }

        let cancelled = self
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled);
        let tally = outcomes.into_tally();

        debug!(
            "Finished {}: {} accepted, {} rejected, {} noise of {} lines read{}",
            self.path.display(),
            tally.accepted,
            tally.rejected(),
            tally.noise,
            tally.lines_read,
            if cancelled { " (cancelled)" } else { "" }
        );

        Ok(FileOutput {
            path: self.path.clone(),
            records,
            summary,
            tally,
            cancelled,
        })
    }
}

/// Pull-based per-line outcome stream for one pass over a file
#[derive(Debug)]
pub struct Outcomes<'p> {
    lines: Lines,
    parser: &'p LineParser,
    cancellation: Option<&'p CancellationToken>,
    tally: LineTally,
}

impl Outcomes<'_> {
    /// Counts for the lines consumed so far
    pub fn tally(&self) -> &LineTally {
        &self.tally
    }

    pub fn into_tally(self) -> LineTally {
        self.tally
    }
}

impl Iterator for Outcomes<'_> {
    type Item = ParseOutcome;

    fn next(&mut self) -> Option<ParseOutcome> {
        loop {
            if self.cancellation.is_some_and(CancellationToken::is_cancelled) {
                return None;
            }

            let line = self.lines.next()?;
            match self.parser.parse_line(&line) {
                None => self.tally.record_noise(),
                Some(outcome) => {
                    if let ParseOutcome::Rejected(reason) = &outcome {
                        trace!("Line {} rejected: {}", self.lines.line_number(), reason);
                    }
                    self.tally.record_outcome(&outcome);
                    return Some(outcome);
                }
            }
        }
    }
}

/// Accepted records and statistics for one file
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutput {
    pub path: PathBuf,
    pub records: Vec<Record>,
    pub summary: FileSummary,
    pub tally: LineTally,
    /// Evaluation stopped early on cancellation; the output covers what was read
    pub cancelled: bool,
}

impl FileOutput {
    pub fn empty(path: PathBuf) -> Self {
        Self {
            path,
            records: Vec::new(),
            summary: FileSummary::new(),
            tally: LineTally::new(),
            cancelled: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn readings(&self) -> impl Iterator<Item = &ReadingRecord> {
        self.records.iter().filter_map(|record| match record {
            Record::Reading(reading) => Some(reading),
            Record::Event(_) => None,
        })
    }

    pub fn events(&self) -> impl Iterator<Item = &LogEventRecord> {
        self.records.iter().filter_map(|record| match record {
            Record::Event(event) => Some(event),
            Record::Reading(_) => None,
        })
    }
}
