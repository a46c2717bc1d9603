//! Record normalization
//!
//! Converts extracted string fields into typed values. Nothing here rejects
//! a line: unparseable timestamps and levels come back as `None` and are
//! judged by the validator.

use crate::constants::{
    READING_TIMESTAMP_FORMAT, READING_TIMESTAMP_SEPARATOR, SYSTEM_LOG_TIMESTAMP_FORMAT,
};
use crate::models::{ReadingFields, SystemLogFields};
use chrono::NaiveDateTime;

/// Reading line after normalization, before validation
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedReading<'a> {
    pub timestamp: Option<NaiveDateTime>,
    pub device: Option<&'a str>,
    pub reading: Option<&'a str>,
    pub raw_value: Option<&'a str>,
    pub numeric_value: Option<f64>,
}

/// System log line after normalization, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEvent<'a> {
    pub timestamp: Option<NaiveDateTime>,
    pub level: Option<i64>,
    pub message: &'a str,
}

pub fn normalize_reading(fields: ReadingFields<'_>) -> NormalizedReading<'_> {
    NormalizedReading {
        timestamp: parse_reading_timestamp(fields.ts_raw),
        device: fields.device,
        reading: fields.reading_raw.map(clean_reading_name),
        raw_value: fields.value,
        numeric_value: fields.value.and_then(coerce_f64),
    }
}

pub fn normalize_event(fields: SystemLogFields<'_>) -> NormalizedEvent<'_> {
    NormalizedEvent {
        timestamp: parse_event_timestamp(fields.date, fields.time),
        level: fields.level.parse::<i64>().ok(),
        message: fields.message,
    }
}

/// `2024-03-01_00:00:00` style timestamp; only the first `_` is replaced
pub fn parse_reading_timestamp(ts_raw: &str) -> Option<NaiveDateTime> {
    let text = ts_raw.replacen(READING_TIMESTAMP_SEPARATOR, " ", 1);
    NaiveDateTime::parse_from_str(&text, READING_TIMESTAMP_FORMAT).ok()
}

/// `2024.03.01` + `00:00:01` style timestamp
pub fn parse_event_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let text = format!("{} {}", date, time);
    NaiveDateTime::parse_from_str(&text, SYSTEM_LOG_TIMESTAMP_FORMAT).ok()
}

/// Strip exactly one trailing colon
pub fn clean_reading_name(raw: &str) -> &str {
    raw.strip_suffix(':').unwrap_or(raw)
}

/// Best-effort numeric value; surrounding whitespace is ignored
pub fn coerce_f64(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}
