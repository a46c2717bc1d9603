//! Line source for raw log files
//!
//! Yields the lines of a file in order, tolerating invalid byte sequences
//! by lossy UTF-8 substitution. Each call to [`LineSource::lines`] opens a
//! fresh reader, so a source can be consumed any number of times.

use crate::error::{FhemError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A readable, non-empty log file
#[derive(Debug, Clone)]
pub struct LineSource {
    path: PathBuf,
    byte_len: u64,
}

impl LineSource {
    /// Check that `path` can be read.
    ///
    /// Fails with [`FhemError::FileUnavailable`] when the file cannot be opened
    /// and with [`FhemError::EmptyInput`] for a zero-byte file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| FhemError::FileUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        let metadata = file.metadata().map_err(|source| FhemError::FileUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        if metadata.is_dir() {
            return Err(FhemError::FileUnavailable {
                path: path.to_path_buf(),
                source: std::io::Error::other("path is a directory"),
            });
        }

        if metadata.len() == 0 {
            return Err(FhemError::EmptyInput {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            byte_len: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size observed when the source was opened
    pub fn byte_len(&self) -> u64 {
        self.byte_len
    }

    /// Start a new pass over the file
    pub fn lines(&self) -> Result<Lines> {
        let file = File::open(&self.path).map_err(|source| FhemError::FileUnavailable {
            path: self.path.clone(),
            source,
        })?;

        Ok(Lines {
            reader: BufReader::new(file),
            buffer: Vec::with_capacity(256),
            path: self.path.clone(),
            line_number: 0,
            finished: false,
        })
    }
}

/// Iterator over the lines of one pass
#[derive(Debug)]
pub struct Lines {
    reader: BufReader<File>,
    buffer: Vec<u8>,
    path: PathBuf,
    line_number: usize,
    finished: bool,
}

impl Lines {
    /// 1-based number of the line most recently returned
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl Iterator for Lines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }

        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(_) => {
                self.line_number += 1;
                trim_line_ending(&mut self.buffer);

                let line = match String::from_utf8_lossy(&self.buffer) {
                    std::borrow::Cow::Borrowed(text) => text.to_owned(),
                    std::borrow::Cow::Owned(text) => {
                        debug!(
                            "Replaced invalid UTF-8 in {} line {}",
                            self.path.display(),
                            self.line_number
                        );
                        text
                    }
                };
                Some(line)
            }
            Err(e) => {
                // A read failure mid-file ends the pass; lines already yielded stand.
                warn!(
                    "Read error in {} after line {}: {}",
                    self.path.display(),
                    self.line_number,
                    e
                );
                self.finished = true;
                None
            }
        }
    }
}

fn trim_line_ending(buffer: &mut Vec<u8>) {
    if buffer.last() == Some(&b'\n') {
        buffer.pop();
        if buffer.last() == Some(&b'\r') {
            buffer.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_lines_in_file_order() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "first\r\nsecond\nthird").unwrap();

        let source = LineSource::open(temp_file.path()).unwrap();
        let lines: Vec<String> = source.lines().unwrap().collect();

        assert_eq!(lines, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_invalid_utf8_is_substituted_not_fatal() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"ok line\nbad \xff\xfe bytes\nlast line\n").unwrap();

        let source = LineSource::open(temp_file.path()).unwrap();
        let lines: Vec<String> = source.lines().unwrap().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ok line");
        assert!(lines[1].starts_with("bad "));
        assert!(lines[1].contains('\u{FFFD}'));
        assert_eq!(lines[2], "last line");
    }

    #[test]
    fn test_null_bytes_survive_for_classification() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"\0\0\0\nnext\n").unwrap();

        let source = LineSource::open(temp_file.path()).unwrap();
        let lines: Vec<String> = source.lines().unwrap().collect();

        assert_eq!(lines[0], "\0\0\0");
        assert_eq!(lines[1], "next");
    }

    #[test]
    fn test_restartable_per_call() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "a").unwrap();
        writeln!(temp_file, "b").unwrap();

        let source = LineSource::open(temp_file.path()).unwrap();
        let mut first = source.lines().unwrap();
        assert_eq!(first.next().as_deref(), Some("a"));
        assert_eq!(first.line_number(), 1);

        let second: Vec<String> = source.lines().unwrap().collect();
        assert_eq!(second, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_file_signals_empty_input() {
        let temp_file = NamedTempFile::new().unwrap();

        let result = LineSource::open(temp_file.path());
        assert!(matches!(result, Err(FhemError::EmptyInput { .. })));
    }

    #[test]
    fn test_missing_file_signals_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.log");

        match LineSource::open(&missing) {
            Err(FhemError::FileUnavailable { path, .. }) => assert_eq!(path, missing),
            other => panic!("Expected FileUnavailable, got {:?}", other),
        }
    }
}
