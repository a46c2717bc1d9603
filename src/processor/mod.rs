//! Main processing engine with modular architecture.
//!
//! Orchestrates a processing run over many log files using specialized
//! modules for file discovery, Parquet export and console reporting. Each
//! file is an independent unit of work owned end-to-end by one worker;
//! results are merged in file order once a file's pipeline completes.

pub mod discovery;
pub mod report;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{discovery::FileDiscovery, report::ConsoleReporter, writer::ParquetExporter};

use crate::config::ProcessorConfig;
use crate::error::Result;
use crate::models::{FileReport, FileStatus, ProcessingStats};
use crate::parser::LineParser;
use crate::pipeline::FilePipeline;

use futures::future;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::pin::pin;
use std::time::Instant;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Result of one file's unit of work
struct FileResult {
    report: FileReport,
    preview: Option<DataFrame>,
}

/// Main processor for FHEM log conversion
#[derive(Debug)]
pub struct LogProcessor {
    config: ProcessorConfig,
    parser: LineParser,
    exporter: Option<ParquetExporter>,
    cancellation: CancellationToken,
}

impl LogProcessor {
    /// Create a new processor from a validated configuration
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;

        let parser = LineParser::with_strategy(config.pipeline.split_strategy)?;
        let exporter = config
            .export_dir
            .clone()
            .map(|dir| ParquetExporter::new(dir, config.compression));

        Ok(Self {
            config,
            parser,
            exporter,
            cancellation: CancellationToken::new(),
        })
    }

    /// Share an external stop signal with all file pipelines
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Discover files for `pattern` and process them
    pub async fn process_pattern(&self, pattern: &str) -> Result<ProcessingStats> {
        let mut discovery = FileDiscovery::new(pattern);
        let files = discovery.discover_files()?;
        if discovery.skipped() > 0 {
            debug!("Skipped {} non-file matches", discovery.skipped());
        }

        self.process_files(&files).await
    }

    /// Process an ordered list of files with a fixed-size worker pool
    pub async fn process_files(&self, files: &[PathBuf]) -> Result<ProcessingStats> {
        let start_time = Instant::now();

        if let Some(exporter) = &self.exporter {
            exporter.prepare()?;
        }

        let progress = self.create_progress_bar(files.len());
        let reporter = match &progress {
            Some(pb) => ConsoleReporter::new(self.config.report_rejections).with_progress(pb.clone()),
            None => ConsoleReporter::new(self.config.report_rejections),
        };
        reporter.run_started(files.len());

        info!(
            "Processing {} files with {} workers",
            files.len(),
            self.config.workers
        );

        let mut results = pin!(
            stream::iter(files.iter().cloned())
                .take_while(|_| future::ready(!self.cancellation.is_cancelled()))
                .map(|path| self.spawn_file(path))
                .buffered(self.config.workers)
        );

        let mut stats = ProcessingStats::default();
        let mut preview_shown = self.config.preview_rows == 0;

        while let Some(result) = results.next().await {
            if let Some(pb) = &progress {
                pb.inc(1);
                if let Some(name) = result.report.path.file_name() {
                    pb.set_message(name.to_string_lossy().into_owned());
                }
            }

            reporter.file_finished(&result.report);
            if !preview_shown {
                if let Some(frame) = &result.preview {
                    reporter.preview(&result.report, frame);
                    preview_shown = true;
                }
            }

            stats.absorb(&result.report);
        }

        if let Some(pb) = &progress {
            pb.finish_and_clear();
        }

        if self.cancellation.is_cancelled() {
            warn!(
                "Processing cancelled; results cover {} of {} files",
                stats.files_processed + stats.files_empty + stats.files_failed,
                files.len()
            );
        }

        stats.processing_time = start_time.elapsed();
        reporter.run_finished(&stats);

        Ok(stats)
    }

    /// Run one file on the blocking pool
    async fn spawn_file(&self, path: PathBuf) -> FileResult {
        let pipeline = FilePipeline::with_parser(path.clone(), self.parser.clone(), self.config.pipeline)
            .with_cancellation(self.cancellation.clone());
        let exporter = self.exporter.clone();
        let preview_rows = self.config.preview_rows;
        let started = Instant::now();

        task::spawn_blocking(move || process_file(&pipeline, exporter.as_ref(), preview_rows))
            .await
            .unwrap_or_else(|e| {
                error!("Worker for {} failed: {}", path.display(), e);
                FileResult {
                    report: FileReport::failed(path, format!("worker failed: {}", e), started.elapsed()),
                    preview: None,
                }
            })
    }

    fn create_progress_bar(&self, file_count: usize) -> Option<ProgressBar> {
        if !self.config.show_progress {
            return None;
        }

        let pb = ProgressBar::new(file_count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message("Processing files");
        Some(pb)
    }
}

/// Parse, export and summarize one file; never fails the run
fn process_file(
    pipeline: &FilePipeline,
    exporter: Option<&ParquetExporter>,
    preview_rows: usize,
) -> FileResult {
    let started = Instant::now();
    let path = pipeline.path().to_path_buf();

    let output = match pipeline.run() {
        Ok(output) => output,
        Err(e) => {
            error!("Failed to process {}: {:#}", path.display(), e);
            return FileResult {
                report: FileReport::failed(path, e.to_string(), started.elapsed()),
                preview: None,
            };
        }
    };

    let exported = match exporter {
        Some(exporter) if !output.is_empty() => match exporter.export(&output) {
            Ok(written) => written,
            Err(e) => {
                error!("Failed to export {}: {:#}", path.display(), e);
                return FileResult {
                    report: FileReport::failed(path, e.to_string(), started.elapsed()),
                    preview: None,
                };
            }
        },
        _ => Vec::new(),
    };

    let preview = match writer::preview_frame(&output.records, preview_rows) {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Could not build preview for {}: {}", path.display(), e);
            None
        }
    };

    let status = if output.is_empty() {
        FileStatus::Empty
    } else {
        FileStatus::Processed
    };

    FileResult {
        report: FileReport {
            path,
            status,
            summary: output.summary,
            tally: output.tally,
            elapsed: started.elapsed(),
            exported,
        },
        preview,
    }
}

/// Process a single file without a worker pool or console output
pub fn process_single_file(path: &Path, config: &ProcessorConfig) -> Result<FileReport> {
    config.validate()?;
    let pipeline = FilePipeline::new(path, config.pipeline)?;
    let exporter = config
        .export_dir
        .clone()
        .map(|dir| ParquetExporter::new(dir, config.compression));
    if let Some(exporter) = &exporter {
        exporter.prepare()?;
    }

    Ok(process_file(&pipeline, exporter.as_ref(), 0).report)
}
