//! Console reporting for processing runs
//!
//! Prints per-file results, the optional preview and the run summary.
//! When a progress bar is active, output goes through it so lines are not
//! torn by redraws.

use crate::models::{FileReport, FileStatus, FileSummary, ProcessingStats};

use colored::*;
use indicatif::ProgressBar;
use polars::prelude::DataFrame;

/// Reporter writing human-readable results to stdout
#[derive(Debug, Clone)]
pub struct ConsoleReporter {
    report_rejections: bool,
    progress: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new(report_rejections: bool) -> Self {
        Self {
            report_rejections,
            progress: None,
        }
    }

    /// Route output through an active progress bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    fn emit(&self, line: String) {
        match &self.progress {
            Some(pb) => pb.println(line),
            None => println!("{}", line),
        }
    }

    pub fn run_started(&self, file_count: usize) {
        self.emit(format!(
            "{} {} log files",
            "Found".bright_green(),
            file_count.to_string().bright_white().bold()
        ));
    }

    pub fn file_finished(&self, report: &FileReport) {
        for line in file_lines(report, self.report_rejections) {
            self.emit(line);
        }
    }

    pub fn preview(&self, report: &FileReport, frame: &DataFrame) {
        self.emit(format!(
            "{} {}",
            "--- Preview:".bright_cyan(),
            report.path.display()
        ));
        self.emit(format!("{}", frame));
    }

    pub fn run_finished(&self, stats: &ProcessingStats) {
        for line in summary_lines(stats) {
            self.emit(line);
        }
    }
}

/// Time span text, or a note when the file had no valid timestamp
pub fn format_span(summary: &FileSummary) -> String {
    match (summary.min_timestamp, summary.max_timestamp) {
        (Some(min), Some(max)) => format!("{} to {}", min, max),
        _ => "no valid timestamp".to_string(),
    }
}

fn file_lines(report: &FileReport, report_rejections: bool) -> Vec<String> {
    let mut lines = vec![format!("--> {}", report.path.display())];

    match &report.status {
        FileStatus::Processed => lines.push(format!(
            "    {} {} rows ({}) in {}ms",
            "OK:".bright_green(),
            report.summary.row_count.to_string().bright_white(),
            format_span(&report.summary),
            report.elapsed.as_millis()
        )),
        FileStatus::Empty => lines.push(format!(
            "    {}",
            "-> No usable data extracted.".bright_yellow()
        )),
        FileStatus::Failed(reason) => {
            lines.push(format!("    {} {}", "FAILED:".bright_red().bold(), reason))
        }
    }

    for path in &report.exported {
        lines.push(format!("    {} {}", "Exported:".bright_cyan(), path.display()));
    }

    if report_rejections && report.tally.lines_read > 0 {
        lines.push(format!(
            "    {} {} accepted, {} rejected, {} noise ({:.1}% accepted)",
            "Lines:".bright_cyan(),
            report.tally.accepted,
            report.tally.rejected(),
            report.tally.noise,
            report.tally.acceptance_rate()
        ));
        for (reason, count) in report.tally.breakdown() {
            lines.push(format!("      {}: {}", reason, count));
        }
    }

    lines
}

fn summary_lines(stats: &ProcessingStats) -> Vec<String> {
    let mut lines = vec![
        "-".repeat(40),
        format!(
            "{} {} records.",
            "TOTAL:".bright_green().bold(),
            stats.total_rows().to_string().bright_white().bold()
        ),
        format!(
            "{} {:.2} s",
            "Duration:".bright_cyan(),
            stats.processing_time.as_secs_f64()
        ),
    ];

    if let Some(rate) = stats.rows_per_second() {
        lines.push(format!("{} {:.0} rows/s", "Speed:".bright_cyan(), rate));
    }

    if !stats.summary.is_empty() {
        lines.push(format!(
            "{} {}",
            "Span:".bright_cyan(),
            format_span(&stats.summary)
        ));
    }

    lines.push(format!(
        "{} {} processed, {} empty",
        "Files:".bright_cyan(),
        stats.files_processed,
        stats.files_empty
    ));

    if stats.files_failed > 0 {
        lines.push(format!(
            "{} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        ));
    }

    if stats.tally.rejected() > 0 {
        lines.push(format!(
            "{} {}",
            "Rejected lines:".bright_yellow(),
            stats.tally.rejected()
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LineTally, ParseOutcome, RejectReason};
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use std::time::Duration;

    fn processed_report() -> FileReport {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut summary = FileSummary::new();
        summary.observe(day.and_hms_opt(0, 0, 0).unwrap());
        summary.observe(day.and_hms_opt(23, 59, 0).unwrap());

        let mut tally = LineTally::new();
        tally.record_outcome(&ParseOutcome::Rejected(RejectReason::InvalidTimestamp));
        tally.record_noise();

        FileReport {
            path: PathBuf::from("mbus.log"),
            status: FileStatus::Processed,
            summary,
            tally,
            elapsed: Duration::from_millis(12),
            exported: vec![PathBuf::from("out/mbus.parquet")],
        }
    }

    #[test]
    fn test_format_span() {
        let report = processed_report();
        assert_eq!(
            format_span(&report.summary),
            "2024-03-01 00:00:00 to 2024-03-01 23:59:00"
        );
        assert_eq!(format_span(&FileSummary::new()), "no valid timestamp");
    }

    #[test]
    fn test_file_lines_with_rejections() {
        colored::control::set_override(false);
        let lines = file_lines(&processed_report(), true);

        assert_eq!(lines[0], "--> mbus.log");
        assert!(lines[1].contains("OK: 2 rows"));
        assert!(lines[2].contains("out/mbus.parquet"));
        assert!(lines.iter().any(|l| l.contains("invalid timestamp: 1")));

        let quiet = file_lines(&processed_report(), false);
        assert_eq!(quiet.len(), 3);
    }

    #[test]
    fn test_failed_and_empty_lines() {
        colored::control::set_override(false);
        let failed = FileReport::failed(PathBuf::from("gone.log"), "not found", Duration::ZERO);
        assert!(file_lines(&failed, false)[1].contains("FAILED: not found"));

        let mut empty = processed_report();
        empty.status = FileStatus::Empty;
        empty.exported.clear();
        assert!(file_lines(&empty, false)[1].contains("No usable data"));
    }

    #[test]
    fn test_summary_lines() {
        colored::control::set_override(false);
        let mut stats = ProcessingStats::default();
        stats.absorb(&processed_report());
        stats.processing_time = Duration::from_secs(2);

        let lines = summary_lines(&stats);
        assert!(lines.iter().any(|l| l == "TOTAL: 2 records."));
        assert!(lines.iter().any(|l| l == "Speed: 1 rows/s"));
        assert!(lines.iter().any(|l| l.contains("Rejected lines: 1")));
        assert!(!lines.iter().any(|l| l.contains("Files failed")));
    }
}
