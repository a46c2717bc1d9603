//! Line classification
//!
//! Decides per raw line whether it is noise, a system log line or a
//! (provisional) device reading line. Classification is only a hint;
//! extraction may still reject the line.

use crate::constants::{NOISE_MARKERS, NULL_BYTE};
use crate::models::{Grammar, LineClass};
use regex::Regex;

/// Classifier holding the compiled system log pattern
#[derive(Debug, Clone)]
pub struct LineClassifier {
    system_log: Regex,
}

impl LineClassifier {
    pub fn new(system_log: Regex) -> Self {
        Self { system_log }
    }

    pub fn classify(&self, line: &str) -> LineClass {
        if is_noise(line) {
            return LineClass::Noise;
        }

        if self.system_log.is_match(line) {
            LineClass::Data(Grammar::SystemLogLine)
        } else {
            LineClass::Data(Grammar::ReadingLine)
        }
    }
}

/// Null bytes, known status markers and blank lines carry no data
pub fn is_noise(line: &str) -> bool {
    line.contains(NULL_BYTE)
        || line.trim().is_empty()
        || NOISE_MARKERS.iter().any(|marker| line.contains(marker))
}
