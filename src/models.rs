//! Core data structures and types for FHEM log processing.
//!
//! Defines line grammars, extracted field views, typed records, per-line
//! outcomes, per-file summaries and run-level statistics.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Line grammars understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grammar {
    /// `<date>_<time> <device> <reading>: <value>`
    ReadingLine,
    /// `<date> <time> <level> <message>` with a dot-separated date
    SystemLogLine,
}

/// Result of classifying one raw line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Routine chatter or corruption marker, dropped without diagnostics
    Noise,
    Data(Grammar),
}

/// Bounded-split fields of a reading line, borrowed from the raw line.
///
/// Trailing fields are `None` when the line had fewer tokens than expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingFields<'a> {
    pub ts_raw: &'a str,
    pub device: Option<&'a str>,
    pub reading_raw: Option<&'a str>,
    /// Remainder of the line after the third delimiter, unsplit
    pub value: Option<&'a str>,
}

/// Captured fields of a system log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemLogFields<'a> {
    pub date: &'a str,
    pub time: &'a str,
    pub level: &'a str,
    pub message: &'a str,
}

/// Grammar-specific extraction result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractedFields<'a> {
    Reading(ReadingFields<'a>),
    SystemLog(SystemLogFields<'a>),
}

/// One device reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub timestamp: NaiveDateTime,
    pub device: String,
    pub reading: String,
    /// Value text exactly as logged, kept even when it is not numeric
    pub raw_value: String,
    pub numeric_value: Option<f64>,
}

/// One system log event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEventRecord {
    pub timestamp: NaiveDateTime,
    /// Leading integer of the line; semantics beyond "integer" are not inferred
    pub level: i64,
    pub message: String,
}

/// Accepted record of any grammar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Record {
    Reading(ReadingRecord),
    Event(LogEventRecord),
}

impl Record {
    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            Record::Reading(r) => r.timestamp,
            Record::Event(e) => e.timestamp,
        }
    }

    pub fn grammar(&self) -> Grammar {
        match self {
            Record::Reading(_) => Grammar::ReadingLine,
            Record::Event(_) => Grammar::SystemLogLine,
        }
    }
}

/// Why a data line was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RejectReason {
    /// Fewer tokens than the grammar requires
    MissingRequiredField,
    /// Timestamp text did not normalize to a point in time
    InvalidTimestamp,
    /// The anchored system log pattern did not match
    PatternMismatch,
}

impl RejectReason {
    pub const ALL: [RejectReason; 3] = [
        RejectReason::MissingRequiredField,
        RejectReason::InvalidTimestamp,
        RejectReason::PatternMismatch,
    ];
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RejectReason::MissingRequiredField => "missing required field",
            RejectReason::InvalidTimestamp => "invalid timestamp",
            RejectReason::PatternMismatch => "pattern mismatch",
        };
        f.write_str(label)
    }
}

/// Outcome of parsing one data line
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Accepted(Record),
    Rejected(RejectReason),
}

impl ParseOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ParseOutcome::Accepted(_))
    }
}

/// Row count and time span of the accepted records of one file (or a whole run)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub row_count: usize,
    pub min_timestamp: Option<NaiveDateTime>,
    pub max_timestamp: Option<NaiveDateTime>,
}

impl FileSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a summary over a record sequence
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        records.into_iter().fold(Self::new(), |mut summary, record| {
            summary.observe(record.timestamp());
            summary
        })
    }

    /// Account for one accepted record
    pub fn observe(&mut self, timestamp: NaiveDateTime) {
        self.row_count += 1;
        self.min_timestamp = Some(self.min_timestamp.map_or(timestamp, |t| t.min(timestamp)));
        self.max_timestamp = Some(self.max_timestamp.map_or(timestamp, |t| t.max(timestamp)));
    }

    /// Combine two independent summaries (sum of counts, min/max of bounds)
    pub fn merge(&self, other: &FileSummary) -> FileSummary {
        let pick = |a: Option<NaiveDateTime>, b: Option<NaiveDateTime>, f: fn(NaiveDateTime, NaiveDateTime) -> NaiveDateTime| {
            match (a, b) {
                (Some(a), Some(b)) => Some(f(a, b)),
                (a, b) => a.or(b),
            }
        };

        FileSummary {
            row_count: self.row_count + other.row_count,
            min_timestamp: pick(self.min_timestamp, other.min_timestamp, std::cmp::min),
            max_timestamp: pick(self.max_timestamp, other.max_timestamp, std::cmp::max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Whether a timestamp lies within the summary bounds
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        match (self.min_timestamp, self.max_timestamp) {
            (Some(min), Some(max)) => min <= timestamp && timestamp <= max,
            _ => false,
        }
    }
}

/// Per-line accounting for one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTally {
    pub lines_read: usize,
    pub noise: usize,
    pub accepted: usize,
    pub missing_required_field: usize,
    pub invalid_timestamp: usize,
    pub pattern_mismatch: usize,
}

impl LineTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_noise(&mut self) {
        self.lines_read += 1;
        self.noise += 1;
    }

    pub fn record_outcome(&mut self, outcome: &ParseOutcome) {
        self.lines_read += 1;
        match outcome {
            ParseOutcome::Accepted(_) => self.accepted += 1,
            ParseOutcome::Rejected(reason) => *self.slot(*reason) += 1,
        }
    }

    fn slot(&mut self, reason: RejectReason) -> &mut usize {
        match reason {
            RejectReason::MissingRequiredField => &mut self.missing_required_field,
            RejectReason::InvalidTimestamp => &mut self.invalid_timestamp,
            RejectReason::PatternMismatch => &mut self.pattern_mismatch,
        }
    }

    pub fn count(&self, reason: RejectReason) -> usize {
        match reason {
            RejectReason::MissingRequiredField => self.missing_required_field,
            RejectReason::InvalidTimestamp => self.invalid_timestamp,
            RejectReason::PatternMismatch => self.pattern_mismatch,
        }
    }

    /// Total rejected data lines (noise excluded)
    pub fn rejected(&self) -> usize {
        self.missing_required_field + self.invalid_timestamp + self.pattern_mismatch
    }

    /// Non-zero rejection counts in a stable order
    pub fn breakdown(&self) -> Vec<(RejectReason, usize)> {
        RejectReason::ALL
            .iter()
            .map(|&reason| (reason, self.count(reason)))
            .filter(|&(_, count)| count > 0)
            .collect()
    }

    pub fn merge(&mut self, other: &LineTally) {
        self.lines_read += other.lines_read;
        self.noise += other.noise;
        self.accepted += other.accepted;
        self.missing_required_field += other.missing_required_field;
        self.invalid_timestamp += other.invalid_timestamp;
        self.pattern_mismatch += other.pattern_mismatch;
    }

    /// Accepted share of data lines as a percentage
    pub fn acceptance_rate(&self) -> f64 {
        let data_lines = self.accepted + self.rejected();
        if data_lines == 0 {
            0.0
        } else {
            (self.accepted as f64 / data_lines as f64) * 100.0
        }
    }
}

/// Final state of one file in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// At least one record accepted
    Processed,
    /// Readable but produced no records (zero bytes or nothing usable)
    Empty,
    /// Skipped after a file-level failure
    Failed(String),
}

/// What the reporter receives per file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    pub summary: FileSummary,
    pub tally: LineTally,
    pub elapsed: Duration,
    pub exported: Vec<PathBuf>,
}

impl FileReport {
    pub fn failed(path: PathBuf, reason: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            path,
            status: FileStatus::Failed(reason.into()),
            summary: FileSummary::new(),
            tally: LineTally::new(),
            elapsed,
            exported: Vec::new(),
        }
    }
}

/// Processing statistics for a whole run
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_empty: usize,
    pub files_failed: usize,
    pub summary: FileSummary,
    pub tally: LineTally,
    pub exported_files: usize,
    pub processing_time: Duration,
}

impl ProcessingStats {
    pub fn total_rows(&self) -> usize {
        self.summary.row_count
    }

    /// Fold one file's result into the run aggregate
    pub fn absorb(&mut self, report: &FileReport) {
        match report.status {
            FileStatus::Processed => self.files_processed += 1,
            FileStatus::Empty => self.files_empty += 1,
            FileStatus::Failed(_) => self.files_failed += 1,
        }
        self.summary = self.summary.merge(&report.summary);
        self.tally.merge(&report.tally);
        self.exported_files += report.exported.len();
    }

    /// Throughput, `None` when no measurable time elapsed
    pub fn rows_per_second(&self) -> Option<f64> {
        let secs = self.processing_time.as_secs_f64();
        (secs > 0.0).then(|| self.total_rows() as f64 / secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn event(timestamp: NaiveDateTime) -> Record {
        Record::Event(LogEventRecord {
            timestamp,
            level: 3,
            message: "tick".to_string(),
        })
    }

    #[test]
    fn test_summary_bounds_from_records() {
        let records = vec![event(ts(2, 0)), event(ts(1, 5)), event(ts(3, 1))];
        let summary = FileSummary::from_records(&records);

        assert_eq!(summary.row_count, 3);
        assert_eq!(summary.min_timestamp, Some(ts(1, 5)));
        assert_eq!(summary.max_timestamp, Some(ts(3, 1)));
        assert!(records.iter().all(|r| summary.contains(r.timestamp())));
    }

    #[test]
    fn test_empty_summary_has_null_bounds() {
        let summary = FileSummary::from_records(&[]);
        assert!(summary.is_empty());
        assert_eq!(summary.min_timestamp, None);
        assert_eq!(summary.max_timestamp, None);
    }

    #[test]
    fn test_summary_merge() {
        let a = FileSummary::from_records(&[event(ts(2, 0)), event(ts(4, 0))]);
        let b = FileSummary::from_records(&[event(ts(1, 0))]);
        let empty = FileSummary::new();

        let merged = a.merge(&b).merge(&empty);
        assert_eq!(merged.row_count, 3);
        assert_eq!(merged.min_timestamp, Some(ts(1, 0)));
        assert_eq!(merged.max_timestamp, Some(ts(4, 0)));
        assert_eq!(empty.merge(&empty), FileSummary::new());
    }

    #[test]
    fn test_tally_breakdown_and_rate() {
        let mut tally = LineTally::new();
        tally.record_noise();
        tally.record_outcome(&ParseOutcome::Accepted(event(ts(1, 0))));
        tally.record_outcome(&ParseOutcome::Accepted(event(ts(1, 1))));
        tally.record_outcome(&ParseOutcome::Accepted(event(ts(1, 2))));
        tally.record_outcome(&ParseOutcome::Rejected(RejectReason::InvalidTimestamp));

        assert_eq!(tally.lines_read, 5);
        assert_eq!(tally.rejected(), 1);
        assert_eq!(tally.breakdown(), vec![(RejectReason::InvalidTimestamp, 1)]);
        assert_eq!(tally.acceptance_rate(), 75.0);
        assert_eq!(LineTally::new().acceptance_rate(), 0.0);
    }

    #[test]
    fn test_stats_absorb_reports() {
        let mut stats = ProcessingStats::default();
        let mut tally = LineTally::new();
        tally.record_outcome(&ParseOutcome::Accepted(event(ts(1, 0))));

        stats.absorb(&FileReport {
            path: PathBuf::from("a.log"),
            status: FileStatus::Processed,
            summary: FileSummary::from_records(&[event(ts(1, 0))]),
            tally,
            elapsed: Duration::from_millis(5),
            exported: vec![PathBuf::from("a.parquet")],
        });
        stats.absorb(&FileReport::failed(
            PathBuf::from("b.log"),
            "unreadable",
            Duration::ZERO,
        ));

        assert_eq!(stats.files_processed, 1);
        assert_eq!(stats.files_failed, 1);
        assert_eq!(stats.total_rows(), 1);
        assert_eq!(stats.exported_files, 1);
        assert_eq!(stats.rows_per_second(), None);
    }
}
