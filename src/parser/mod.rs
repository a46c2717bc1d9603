//! Line parser for FHEM device and event logs
//!
//! Turns one raw line into a typed record or a rejection reason, tolerating
//! arbitrary per-line malformation.
//!
//! ## Architecture
//!
//! The parser is organized into the stages a line passes through:
//! - [`source`] - Raw line reading with lossy UTF-8 handling
//! - [`classifier`] - Noise detection and grammar selection
//! - [`extractor`] - Bounded/naive splitting and anchored capture
//! - [`normalizer`] - Timestamp parsing, name cleanup, numeric coercion
//! - [`validator`] - Missing field and timestamp checks
//!
//! ## Usage
//!
//! ```rust
//! use fhem_processor::parser::LineParser;
//! use fhem_processor::models::{ParseOutcome, Record};
//!
//! # fn example() -> fhem_processor::Result<()> {
//! let parser = LineParser::new()?;
//! let outcome = parser.parse_line("2024-03-01_00:00:00 mbus switch: on");
//!
//! if let Some(ParseOutcome::Accepted(Record::Reading(reading))) = outcome {
//!     assert_eq!(reading.raw_value, "on");
//!     assert_eq!(reading.numeric_value, None);
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod extractor;
pub mod normalizer;
pub mod source;
pub mod validator;

pub use classifier::LineClassifier;
pub use extractor::FieldExtractor;
pub use source::{LineSource, Lines};

use crate::config::SplitStrategy;
use crate::constants::SYSTEM_LOG_PATTERN;
use crate::error::Result;
use crate::models::{ExtractedFields, LineClass, ParseOutcome, RejectReason};
use regex::Regex;

/// Classify → extract → normalize → validate for a single line
#[derive(Debug, Clone)]
pub struct LineParser {
    classifier: LineClassifier,
    extractor: FieldExtractor,
}

impl LineParser {
    pub fn new() -> Result<Self> {
        Self::with_strategy(SplitStrategy::default())
    }

    pub fn with_strategy(strategy: SplitStrategy) -> Result<Self> {
        let system_log = Regex::new(SYSTEM_LOG_PATTERN)?;

        Ok(Self {
            classifier: LineClassifier::new(system_log.clone()),
            extractor: FieldExtractor::new(system_log, strategy),
        })
    }

    pub fn strategy(&self) -> SplitStrategy {
        self.extractor.strategy()
    }

    /// Parse one line; `None` means the line was noise
    pub fn parse_line(&self, line: &str) -> Option<ParseOutcome> {
        let grammar = match self.classifier.classify(line) {
            LineClass::Noise => return None,
            LineClass::Data(grammar) => grammar,
        };

        let outcome = match self.extractor.extract(grammar, line) {
            Ok(ExtractedFields::Reading(fields)) => {
                validator::validate_reading(normalizer::normalize_reading(fields))
            }
            Ok(ExtractedFields::SystemLog(fields)) => {
                validator::validate_event(normalizer::normalize_event(fields))
            }
            Err(reason) => ParseOutcome::Rejected(reason),
        };

        Some(outcome)
    }

    /// Rejection reason for a data line, `None` for accepted lines and noise
    pub fn rejection(&self, line: &str) -> Option<RejectReason> {
        match self.parse_line(line)? {
            ParseOutcome::Rejected(reason) => Some(reason),
            ParseOutcome::Accepted(_) => None,
        }
    }
}
