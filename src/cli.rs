//! Command-line interface components.

use crate::config::{CompressionAlgorithm, ProcessorConfig};
use crate::constants::{DEFAULT_PREVIEW_ROWS, UNLIMITED_ROWS};
use crate::error::Result;

use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "fhem_processor")]
#[command(about = "Parse corrupted FHEM device and event logs into clean tables")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Glob pattern selecting the log files, e.g. "data/raw/fhem/mbus-*.log"
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Maximum accepted rows per file (0 = unlimited)
    #[arg(short, long, default_value_t = UNLIMITED_ROWS)]
    pub limit: usize,

    /// Write one Parquet file per log into this directory
    #[arg(short, long, value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Number of files processed concurrently
    #[arg(short, long, default_value_t = num_cpus::get())]
    pub workers: usize,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy")]
    pub compression: String,

    /// Show per-file line counts by rejection reason
    #[arg(long)]
    pub rejections: bool,

    /// Rows shown from the first file with data (0 disables the preview)
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub preview: usize,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Enable verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Build the processor configuration from the parsed arguments
    pub fn to_config(&self) -> Result<ProcessorConfig> {
        let compression: CompressionAlgorithm = self.compression.parse()?;

        let mut config = ProcessorConfig::default()
            .with_workers(self.workers)
            .with_row_limit(self.limit)
            .with_compression(compression)
            .with_preview_rows(self.preview);

        if let Some(dir) = &self.export {
            config = config.with_export_dir(dir);
        }
        if self.rejections {
            config = config.with_rejection_report();
        }
        if self.no_progress || self.quiet {
            config = config.without_progress();
        }

        Ok(config)
    }
}

/// Set up structured logging on stderr so stdout carries only the report
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fhem_processor={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}
