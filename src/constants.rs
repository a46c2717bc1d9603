//! Application constants for the FHEM log processor
//!
//! Line grammar details, noise markers and default values shared by the
//! parser, the pipeline and the CLI.

// =============================================================================
// Line Grammars
// =============================================================================

/// Timestamp layout of device reading lines once `_` is replaced by a space
pub const READING_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Separator between date and time in raw reading timestamps
pub const READING_TIMESTAMP_SEPARATOR: char = '_';

/// Field delimiter for device reading lines
pub const READING_FIELD_DELIMITER: char = ' ';

/// Number of fields produced by the bounded split (ts, device, reading, value)
pub const READING_FIELD_COUNT: usize = 4;

/// Timestamp layout of system log lines (dot-separated date)
pub const SYSTEM_LOG_TIMESTAMP_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// Anchored pattern for system log lines: `DATE TIME LEVEL MESSAGE`
pub const SYSTEM_LOG_PATTERN: &str = r"^(?P<date>\d{4}\.\d{2}\.\d{2}) (?P<time>\d{2}:\d{2}:\d{2}) (?P<level>\d+) (?P<message>.*)$";

// =============================================================================
// Noise Markers
// =============================================================================

/// Null byte left behind by truncated writes (power loss)
pub const NULL_BYTE: char = '\0';

/// Case-sensitive substrings marking routine, non-data lines
pub const NOISE_MARKERS: &[&str] = &["CONNECTED", "Exiting", "Server started"];

// =============================================================================
// Export
// =============================================================================

/// Extension of the log files the exporter renames
pub const LOG_FILE_EXTENSION: &str = ".log";

/// Extension for exported reading tables
pub const PARQUET_EXTENSION: &str = ".parquet";

/// Suffix for exported event tables (before the parquet extension)
pub const EVENTS_SUFFIX: &str = ".events";

/// Reading table column names in export order
pub mod reading_columns {
    pub const TIMESTAMP: &str = "timestamp";
    pub const DEVICE: &str = "device";
    pub const READING: &str = "reading";
    pub const VALUE: &str = "value";
    pub const VALUE_NUM: &str = "value_num";
}

/// Event table column names in export order
pub mod event_columns {
    pub const TIMESTAMP: &str = "timestamp";
    pub const LEVEL: &str = "level";
    pub const MESSAGE: &str = "message";
}

// =============================================================================
// Defaults
// =============================================================================

/// Row limit meaning "read everything"
pub const UNLIMITED_ROWS: usize = 0;

/// Rows shown in the preview of the first file with data
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
