//! Integration tests for the processor module
//!
//! Tests complete processing runs over directories of FHEM logs.

pub mod error_handling;

use std::fs;
use std::path::{Path, PathBuf};

pub const MBUS_LOG: &str = "\
2024-03-01_00:00:00 mbus power: 100
2024-03-01_00:15:00 mbus power: 120
2024-03-01_00:30:00 mbus energy: 1.5 kWh
";

pub const FHEM_LOG: &str = "\
2024.03.02 08:00:00 3 Server started
2024.03.02 08:00:01 1 FHEMWEB port 8083 opened
2024-03-02_08:05:00 lamp state: on
2024-03-02_08:06:00 lamp
";

/// Write `contents` to `dir/name` and return the path
pub fn write_log(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}
