//! Final gate before a record is accepted
//!
//! A missing value field is checked before the timestamp: it is the only
//! reliable sign that a reading line did not contain four tokens.

use super::normalizer::{NormalizedEvent, NormalizedReading};
use crate::models::{LogEventRecord, ParseOutcome, ReadingRecord, Record, RejectReason};

pub fn validate_reading(normalized: NormalizedReading<'_>) -> ParseOutcome {
    let (Some(device), Some(reading), Some(raw_value)) =
        (normalized.device, normalized.reading, normalized.raw_value)
    else {
        return ParseOutcome::Rejected(RejectReason::MissingRequiredField);
    };

    let Some(timestamp) = normalized.timestamp else {
        return ParseOutcome::Rejected(RejectReason::InvalidTimestamp);
    };

    ParseOutcome::Accepted(Record::Reading(ReadingRecord {
        timestamp,
        device: device.to_string(),
        reading: reading.to_string(),
        raw_value: raw_value.to_string(),
        numeric_value: normalized.numeric_value,
    }))
}

pub fn validate_event(normalized: NormalizedEvent<'_>) -> ParseOutcome {
    // The pattern guarantees digits, so a missing level means overflow.
    let Some(level) = normalized.level else {
        return ParseOutcome::Rejected(RejectReason::PatternMismatch);
    };

    let Some(timestamp) = normalized.timestamp else {
        return ParseOutcome::Rejected(RejectReason::InvalidTimestamp);
    };

    ParseOutcome::Accepted(Record::Event(LogEventRecord {
        timestamp,
        level,
        message: normalized.message.to_string(),
    }))
}
