//! Configuration management and validation.
//!
//! Provides the core pipeline options (row limit, split strategy) and the
//! run-level settings used by the processor: worker count, export target,
//! compression and reporting switches.

use crate::constants::{DEFAULT_PREVIEW_ROWS, UNLIMITED_ROWS};
use crate::error::{FhemError, Result};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// Strategy for splitting reading lines into fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitStrategy {
    /// Split on every delimiter and keep the first four tokens
    Naive,
    /// Split on the first three delimiters; the value keeps the rest of the line
    #[default]
    Bounded,
}

/// Options consumed by a single file pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Stop after this many accepted records (0 = unlimited)
    pub row_limit: usize,

    /// Reading line split strategy
    pub split_strategy: SplitStrategy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            row_limit: UNLIMITED_ROWS,
            split_strategy: SplitStrategy::default(),
        }
    }
}

impl PipelineOptions {
    /// Row limit as an option, `None` meaning unlimited
    pub fn effective_limit(&self) -> Option<usize> {
        (self.row_limit != UNLIMITED_ROWS).then_some(self.row_limit)
    }

    pub fn with_row_limit(mut self, row_limit: usize) -> Self {
        self.row_limit = row_limit;
        self
    }

    pub fn with_split_strategy(mut self, split_strategy: SplitStrategy) -> Self {
        self.split_strategy = split_strategy;
        self
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    #[default]
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = FhemError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(FhemError::Configuration {
                message: format!(
                    "Unknown compression '{}' (expected snappy, zstd, lz4 or none)",
                    other
                ),
            }),
        }
    }
}

/// Global configuration for a processing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Per-file pipeline options
    pub pipeline: PipelineOptions,

    /// Number of files processed concurrently
    pub workers: usize,

    /// Directory for Parquet export (no export when unset)
    pub export_dir: Option<PathBuf>,

    /// Parquet compression algorithm
    pub compression: CompressionAlgorithm,

    /// Report a per-reason rejection breakdown for each file
    pub report_rejections: bool,

    /// Rows shown from the first file with data (0 = no preview)
    pub preview_rows: usize,

    /// Show a progress bar while files are processed
    pub show_progress: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineOptions::default(),
            workers: num_cpus::get(),
            export_dir: None,
            compression: CompressionAlgorithm::default(),
            report_rejections: false,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            show_progress: true,
        }
    }
}

impl ProcessorConfig {
    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Limit the accepted rows read per file
    pub fn with_row_limit(mut self, row_limit: usize) -> Self {
        self.pipeline.row_limit = row_limit;
        self
    }

    /// Export each file to Parquet below `export_dir`
    pub fn with_export_dir(mut self, export_dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(export_dir.into());
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    /// Enable per-reason rejection reporting
    pub fn with_rejection_report(mut self) -> Self {
        self.report_rejections = true;
        self
    }

    pub fn with_preview_rows(mut self, preview_rows: usize) -> Self {
        self.preview_rows = preview_rows;
        self
    }

    /// Disable the progress bar (tests, non-interactive runs)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Check settings before a run
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(FhemError::Configuration {
                message: "workers must be at least 1".to_string(),
            });
        }

        debug!(
            "Configuration: {} workers, row limit {:?}, export {:?}, compression {:?}",
            self.workers,
            self.pipeline.effective_limit(),
            self.export_dir,
            self.compression
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline_options() {
        let options = PipelineOptions::default();

        assert_eq!(options.row_limit, 0);
        assert_eq!(options.effective_limit(), None);
        assert_eq!(options.split_strategy, SplitStrategy::Bounded);
        assert_eq!(options.with_row_limit(10).effective_limit(), Some(10));
    }

    #[test]
    fn test_compression_parsing() {
        assert_eq!(
            "snappy".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Snappy
        );
        assert_eq!(
            "ZSTD".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Zstd
        );
        assert_eq!(
            "none".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Uncompressed
        );
        assert!("brotli".parse::<CompressionAlgorithm>().is_err());
    }

    #[test]
    fn test_config_builders_and_validation() {
        let config = ProcessorConfig::default()
            .with_workers(2)
            .with_row_limit(100)
            .with_export_dir("out")
            .with_rejection_report()
            .without_progress();

        assert_eq!(config.workers, 2);
        assert_eq!(config.pipeline.effective_limit(), Some(100));
        assert_eq!(config.export_dir, Some(PathBuf::from("out")));
        assert!(config.report_rejections);
        assert!(!config.show_progress);
        assert!(config.validate().is_ok());

        let invalid = ProcessorConfig::default().with_workers(0);
        assert!(matches!(
            invalid.validate(),
            Err(FhemError::Configuration { .. })
        ));
    }
}
