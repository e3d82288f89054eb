use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::record::{TimestampField, Transaction};

/// Calendar parts of one row's timestamp. All fields are `None` when the
/// value was missing or unparseable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatetimeParts {
    pub hour: Option<u32>,
    pub day: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Lenient timestamp parsing. Timezone-aware values are normalized to naive
/// UTC so that recency arithmetic stays well-defined across mixed offsets.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }

    None
}

/// Expand the chosen timestamp column into hour/day/month/year per row.
/// Returns one entry per input row, in input order; the input is untouched.
pub fn decompose(transactions: &[Transaction], field: TimestampField) -> Vec<DatetimeParts> {
    use chrono::{Datelike, Timelike};

    transactions
        .iter()
        .map(|tx| match field.get(tx).and_then(parse_timestamp) {
            Some(dt) => DatetimeParts {
                hour: Some(dt.hour()),
                day: Some(dt.day()),
                month: Some(dt.month()),
                year: Some(dt.year()),
            },
            None => DatetimeParts::default(),
        })
        .collect()
}
