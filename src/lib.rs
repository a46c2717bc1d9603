//! FHEM Log Processor Library
//!
//! A Rust library for turning corrupted FHEM home-automation logs into
//! clean, typed tables.
//!
//! This library provides tools for:
//! - Classifying each raw line as noise, a device reading or a system log event
//! - Extracting and normalizing fields with per-line rejection reasons
//! - Lazily evaluated per-file pipelines with row limits and cancellation
//! - Processing many files with a worker pool and exporting Parquet
//!
//! A malformed line never fails a file, and an unreadable file never fails
//! a run.

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod processor;

pub use config::{CompressionAlgorithm, PipelineOptions, ProcessorConfig, SplitStrategy};
pub use error::{FhemError, Result};
pub use models::{
    FileReport, FileStatus, FileSummary, Grammar, LineTally, LogEventRecord, ParseOutcome,
    ProcessingStats, ReadingRecord, Record, RejectReason,
};
pub use parser::LineParser;
pub use pipeline::{FileOutput, FilePipeline};
pub use processor::LogProcessor;
