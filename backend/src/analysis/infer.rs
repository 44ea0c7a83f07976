//! Column type inference.
//!
//! Every non-empty value is tested against three independent buckets
//! (number, date, boolean); a value may land in several. The first bucket
//! reaching [`TYPE_THRESHOLD`] of the non-empty values decides the type, in
//! the order number, date, boolean.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::DataType;

/// Fraction of non-empty values a bucket needs to claim the column.
pub const TYPE_THRESHOLD: f64 = 0.8;

const BOOLEAN_TOKENS: [&str; 6] = ["true", "false", "yes", "no", "0", "1"];

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2}|\d{2}/\d{2}/\d{4}").expect("valid date pattern")
});

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];

const DATETIME_FORMATS: [&str; 9] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// True when the value is blank after trimming.
pub fn is_missing(value: &str) -> bool {
    value.trim().is_empty()
}

/// Parse a value as a finite number.
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

pub fn is_number(value: &str) -> bool {
    parse_number(value).is_some()
}

pub fn is_boolean(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    BOOLEAN_TOKENS.contains(&lowered.as_str())
}

/// A date needs both an ISO-like or slash-separated date pattern and a
/// successful calendar parse of the whole value.
pub fn is_date(value: &str) -> bool {
    let trimmed = value.trim();
    DATE_PATTERN.is_match(trimmed) && parses_as_date(trimmed)
}

fn parses_as_date(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || DATE_FORMATS
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(value, fmt).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
}

/// Bucket counts over the non-empty values of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeCounts {
    pub non_empty: usize,
    pub number: usize,
    pub date: usize,
    pub boolean: usize,
}

impl TypeCounts {
    pub fn tally<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts = Self::default();
        for value in values.into_iter().filter(|v| !is_missing(v)) {
            counts.non_empty += 1;
            if is_boolean(value) {
                counts.boolean += 1;
            }
            if is_number(value) {
                counts.number += 1;
            }
            if is_date(value) {
                counts.date += 1;
            }
        }
        counts
    }

    /// Apply the decision rule.
    pub fn classify(&self) -> DataType {
        if self.non_empty == 0 {
            return DataType::Empty;
        }

        let total = self.non_empty as f64;
        let share = |count: usize| count as f64 / total;

        if share(self.number) >= TYPE_THRESHOLD {
            DataType::Number
        } else if share(self.date) >= TYPE_THRESHOLD {
            DataType::Date
        } else if share(self.boolean) >= TYPE_THRESHOLD {
            DataType::Boolean
        } else if self.number > 0 || self.date > 0 || self.boolean > 0 {
            DataType::Mixed
        } else {
            DataType::String
        }
    }
}

/// Infer the dominant type of a column from its raw values (blanks included).
pub fn infer_data_type<'a, I>(values: I) -> DataType
where
    I: IntoIterator<Item = &'a str>,
{
    TypeCounts::tally(values).classify()
}
