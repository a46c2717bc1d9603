//! File discovery module for FHEM log files
//!
//! Expands a glob pattern such as `data/raw/fhem/mbus-*.log` into a sorted
//! list of regular files.

use crate::error::{FhemError, Result};
use std::path::PathBuf;
use tracing::{debug, warn};

/// File discovery component for FHEM log files
#[derive(Debug)]
pub struct FileDiscovery {
    pattern: String,
    skipped: usize,
}

impl FileDiscovery {
    /// Create a new file discovery instance
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            skipped: 0,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Matches that could not be read or were not regular files
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Discover all files matching the pattern, sorted by path
    pub fn discover_files(&mut self) -> Result<Vec<PathBuf>> {
        let paths = glob::glob(&self.pattern).map_err(|e| FhemError::InvalidPattern {
            pattern: self.pattern.clone(),
            reason: e.to_string(),
        })?;

        let mut files = Vec::new();
        self.skipped = 0;

        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(path) => {
                    debug!("Skipping non-file match: {}", path.display());
                    self.skipped += 1;
                }
                Err(e) => {
                    warn!("Unreadable match for {}: {}", self.pattern, e);
                    self.skipped += 1;
                }
            }
        }

        if files.is_empty() {
            return Err(FhemError::NoFilesFound {
                pattern: self.pattern.clone(),
            });
        }

        files.sort();
        debug!("Found {} files for pattern {}", files.len(), self.pattern);

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Helper to create a directory of FHEM logs
    fn create_log_dir(temp_dir: &TempDir) -> PathBuf {
        let log_dir = temp_dir.path().join("fhem");
        fs::create_dir_all(log_dir.join("mbus-archive.log")).unwrap();

        fs::write(log_dir.join("mbus-2024-03.log"), "data").unwrap();
        fs::write(log_dir.join("mbus-2024-01.log"), "data").unwrap();
        fs::write(log_dir.join("mbus-2024-02.log"), "data").unwrap();
        fs::write(log_dir.join("fhem-2024-03.log"), "data").unwrap();
        fs::write(log_dir.join("notes.txt"), "notes").unwrap();

        log_dir
    }

    #[test]
    fn test_discover_sorted_matches() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = create_log_dir(&temp_dir);

        let pattern = log_dir.join("mbus-*.log").to_string_lossy().to_string();
        let mut discovery = FileDiscovery::new(pattern);
        let files = discovery.discover_files().unwrap();

        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(
            names,
            vec!["mbus-2024-01.log", "mbus-2024-02.log", "mbus-2024-03.log"]
        );
        // the directory named like a log file is not a match
        assert_eq!(discovery.skipped(), 1);
    }

    #[test]
    fn test_literal_path() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = create_log_dir(&temp_dir);

        let pattern = log_dir.join("notes.txt").to_string_lossy().to_string();
        let files = FileDiscovery::new(pattern).discover_files().unwrap();

        assert_eq!(files, vec![log_dir.join("notes.txt")]);
    }

    #[test]
    fn test_no_matches() {
        let temp_dir = TempDir::new().unwrap();
        let pattern = temp_dir.path().join("*.log").to_string_lossy().to_string();

        match FileDiscovery::new(pattern.clone()).discover_files() {
            Err(FhemError::NoFilesFound { pattern: p }) => assert_eq!(p, pattern),
            other => panic!("Expected NoFilesFound, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_pattern() {
        let result = FileDiscovery::new("data/[*.log").discover_files();
        assert!(matches!(result, Err(FhemError::InvalidPattern { .. })));
    }
}
