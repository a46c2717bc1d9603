//! Parquet export module for parsed FHEM logs
//!
//! Builds polars DataFrames from accepted records and writes one Parquet
//! file per source log (plus an events file when the log held system log
//! lines).

use crate::config::CompressionAlgorithm;
use crate::constants::{
    EVENTS_SUFFIX, LOG_FILE_EXTENSION, PARQUET_EXTENSION, event_columns, reading_columns,
};
use crate::error::{FhemError, Result};
use crate::models::{LogEventRecord, ReadingRecord, Record};
use crate::pipeline::FileOutput;

use polars::df;
use polars::prelude::{DataFrame, ParquetWriter as PolarsParquetWriter};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes per-file Parquet output below a directory
#[derive(Debug, Clone)]
pub struct ParquetExporter {
    output_dir: PathBuf,
    compression: CompressionAlgorithm,
}

impl ParquetExporter {
    /// Create a new Parquet exporter
    pub fn new(output_dir: PathBuf, compression: CompressionAlgorithm) -> Self {
        Self {
            output_dir,
            compression,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if needed
    pub fn prepare(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| FhemError::Export {
            path: self.output_dir.clone(),
            reason: format!("Failed to create output directory: {}", e),
        })
    }

    /// Export one file's records; returns the files written
    pub fn export(&self, output: &FileOutput) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        let (readings_name, events_name) = target_names(&output.path);

        if output.readings().next().is_some() {
            let mut df = readings_frame(output.readings())?;
            let target = self.output_dir.join(readings_name);
            self.write_dataframe(&mut df, &target)?;
            written.push(target);
        }

        if output.events().next().is_some() {
            let mut df = events_frame(output.events())?;
            let target = self.output_dir.join(events_name);
            self.write_dataframe(&mut df, &target)?;
            written.push(target);
        }

        Ok(written)
    }

    fn write_dataframe(&self, df: &mut DataFrame, target: &Path) -> Result<()> {
        let file = std::fs::File::create(target).map_err(|e| FhemError::Export {
            path: target.to_path_buf(),
            reason: format!("Failed to create file: {}", e),
        })?;

        PolarsParquetWriter::new(file)
            .with_compression(self.compression.to_polars_compression())
            .finish(df)
            .map_err(|e| FhemError::Export {
                path: target.to_path_buf(),
                reason: format!("Failed to write parquet: {}", e),
            })?;

        debug!("Wrote {} rows to {}", df.height(), target.display());
        Ok(())
    }
}

/// Export names derived from the source base name:
/// `mbus-2024.log` → (`mbus-2024.parquet`, `mbus-2024.events.parquet`)
pub fn target_names(source: &Path) -> (String, String) {
    let base_name = source
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let stem = base_name
        .strip_suffix(LOG_FILE_EXTENSION)
        .unwrap_or(&base_name);

    (
        format!("{}{}", stem, PARQUET_EXTENSION),
        format!("{}{}{}", stem, EVENTS_SUFFIX, PARQUET_EXTENSION),
    )
}

/// Reading table: timestamp, device, reading, value, value_num
pub fn readings_frame<'a>(readings: impl Iterator<Item = &'a ReadingRecord>) -> Result<DataFrame> {
    let mut timestamps = Vec::new();
    let mut devices = Vec::new();
    let mut names = Vec::new();
    let mut values = Vec::new();
    let mut numeric = Vec::new();

    for reading in readings {
        timestamps.push(reading.timestamp);
        devices.push(reading.device.as_str());
        names.push(reading.reading.as_str());
        values.push(reading.raw_value.as_str());
        numeric.push(reading.numeric_value);
    }

    let df = df!(
        reading_columns::TIMESTAMP => timestamps,
        reading_columns::DEVICE => devices,
        reading_columns::READING => names,
        reading_columns::VALUE => values,
        reading_columns::VALUE_NUM => numeric,
    )?;
    Ok(df)
}

/// Event table: timestamp, level, message
pub fn events_frame<'a>(events: impl Iterator<Item = &'a LogEventRecord>) -> Result<DataFrame> {
    let mut timestamps = Vec::new();
    let mut levels = Vec::new();
    let mut messages = Vec::new();

    for event in events {
        timestamps.push(event.timestamp);
        levels.push(event.level);
        messages.push(event.message.as_str());
    }

    let df = df!(
        event_columns::TIMESTAMP => timestamps,
        event_columns::LEVEL => levels,
        event_columns::MESSAGE => messages,
    )?;
    Ok(df)
}

/// First `rows` records as a DataFrame, readings preferred over events
pub fn preview_frame(records: &[Record], rows: usize) -> Result<Option<DataFrame>> {
    if rows == 0 || records.is_empty() {
        return Ok(None);
    }

    let readings = records.iter().filter_map(|record| match record {
        Record::Reading(reading) => Some(reading),
        Record::Event(_) => None,
    });

    if records.iter().any(|r| matches!(r, Record::Reading(_))) {
        return readings_frame(readings.take(rows)).map(Some);
    }

    let events = records.iter().filter_map(|record| match record {
        Record::Event(event) => Some(event),
        Record::Reading(_) => None,
    });
    events_frame(events.take(rows)).map(Some)
}
