//! Field extraction for the supported line grammars
//!
//! Reading lines are split on the space character. The default bounded
//! split stops after the third delimiter so the value keeps any further
//! spaces; the naive split reads exactly four tokens and drops the rest.
//! System log lines are matched against the anchored capture pattern.

use crate::config::SplitStrategy;
use crate::constants::{READING_FIELD_COUNT, READING_FIELD_DELIMITER};
use crate::models::{ExtractedFields, Grammar, ReadingFields, RejectReason, SystemLogFields};
use regex::Regex;

/// Grammar-specific tokenizer
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    system_log: Regex,
    strategy: SplitStrategy,
}

impl FieldExtractor {
    pub fn new(system_log: Regex, strategy: SplitStrategy) -> Self {
        Self {
            system_log,
            strategy,
        }
    }

    pub fn strategy(&self) -> SplitStrategy {
        self.strategy
    }

    /// Extract the fields for `grammar` from `line`.
    ///
    /// Only the system log grammar can fail here; a short reading line
    /// still extracts, with `None` in the missing trailing fields.
    pub fn extract<'a>(
        &self,
        grammar: Grammar,
        line: &'a str,
    ) -> std::result::Result<ExtractedFields<'a>, RejectReason> {
        match grammar {
            Grammar::ReadingLine => Ok(ExtractedFields::Reading(match self.strategy {
                SplitStrategy::Bounded => bounded_split(line),
                SplitStrategy::Naive => naive_split(line),
            })),
            Grammar::SystemLogLine => self
                .capture_system_log(line)
                .map(ExtractedFields::SystemLog)
                .ok_or(RejectReason::PatternMismatch),
        }
    }

    fn capture_system_log<'a>(&self, line: &'a str) -> Option<SystemLogFields<'a>> {
        let captures = self.system_log.captures(line)?;

        Some(SystemLogFields {
            date: captures.name("date")?.as_str(),
            time: captures.name("time")?.as_str(),
            level: captures.name("level")?.as_str(),
            message: captures.name("message")?.as_str(),
        })
    }
}

/// Split on the first three delimiters, leaving the remainder as the value
pub fn bounded_split(line: &str) -> ReadingFields<'_> {
    let mut parts = line.splitn(READING_FIELD_COUNT, READING_FIELD_DELIMITER);

    ReadingFields {
        ts_raw: parts.next().unwrap_or_default(),
        device: parts.next(),
        reading_raw: parts.next(),
        value: parts.next(),
    }
}

/// Fixed-arity split: four tokens, anything after the fourth is dropped
pub fn naive_split(line: &str) -> ReadingFields<'_> {
    let mut parts = line.split(READING_FIELD_DELIMITER);

    ReadingFields {
        ts_raw: parts.next().unwrap_or_default(),
        device: parts.next(),
        reading_raw: parts.next(),
        value: parts.next(),
    }
}
