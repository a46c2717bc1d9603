//! Scenario tests for the file pipeline
//!
//! Tests whole-file behaviour using temporary log files that mix valid
//! readings, system log lines and the corruption seen in real FHEM logs.


use std::io::Write;
use tempfile::NamedTempFile;

/// Write `content` to a temporary `.log` file
pub fn write_log(content: &[u8]) -> NamedTempFile {
    let mut temp_file = tempfile::Builder::new()
        .suffix(".log")
        .tempfile()
        .unwrap();
    temp_file.write_all(content).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// A day of mixed, partly corrupted FHEM output
pub const MIXED_LOG: &str = "\
2024.03.01 00:00:00 1 Server started with 42 defined entities
2024-03-01_00:00:00 mbus 30-HC3-Lueftung-Waermeleistung: 100
2024-03-01_00:05:00 mbus switch: on
CONNECTED
2024-03-01_00:10:00 mbus
2024.03.01 00:10:01 3 Initialized sensor bus
2024-03-01_00:15:00 heating state: set desired-temp 21.5
2024-03-0X_00:20:00 mbus power: 7
2024-03-01_00:25:00 mbus power: 8
2024.03.01 23:59:59 0 Server shutdown Exiting
";
