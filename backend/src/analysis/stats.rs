//! Per-column statistics.
//!
//! Builds a [`ColumnProfile`] from a column's raw value vector: missingness,
//! cardinality, samples, and the type-specific statistics.

use std::collections::HashSet;

use super::infer::{infer_data_type, is_missing, parse_number};
use crate::models::{ColumnProfile, ColumnStats, DataType, NumericStats, StringStats};

/// Number of sample values kept per column.
pub const SAMPLE_SIZE: usize = 5;

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole * 100`, or 0 when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Min, max, mean, median and population standard deviation.
///
/// Returns `None` for an empty slice. Finite inputs always give finite
/// statistics, even near `f64::MAX`.
pub fn numeric_stats(values: &[f64]) -> Option<NumericStats> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let sum = values.iter().sum::<f64>();
    let mean = if sum.is_finite() {
        sum / n
    } else {
        values.iter().map(|v| v / n).sum()
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        sorted[mid - 1] / 2.0 + sorted[mid] / 2.0
    } else {
        sorted[mid]
    };

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = if variance.is_finite() {
        variance.sqrt()
    } else {
        scaled_std_dev(values, mean, min, max)
    };

    Some(NumericStats {
        min,
        max,
        mean,
        median,
        std_dev,
    })
}

/// Standard deviation computed on values scaled into `[-1, 1]`.
///
/// Bounded by half the range, which is finite for finite inputs.
fn scaled_std_dev(values: &[f64], mean: f64, min: f64, max: f64) -> f64 {
    let scale = min.abs().max(max.abs());
    if scale == 0.0 {
        return 0.0;
    }

    let n = values.len() as f64;
    let scaled_mean = mean / scale;
    let variance = values
        .iter()
        .map(|v| (v / scale - scaled_mean).powi(2))
        .sum::<f64>()
        / n;

    (scale * variance.sqrt()).min(max / 2.0 - min / 2.0)
}

/// Character-length statistics over non-empty values.
pub fn string_stats(values: &[&str]) -> Option<StringStats> {
    if values.is_empty() {
        return None;
    }

    let lengths: Vec<usize> = values.iter().map(|v| v.chars().count()).collect();
    let total: usize = lengths.iter().sum();

    Some(StringStats {
        min_length: lengths.iter().copied().min().unwrap_or(0),
        max_length: lengths.iter().copied().max().unwrap_or(0),
        avg_length: round2(total as f64 / lengths.len() as f64),
    })
}

/// Attach the statistics matching `data_type`.
///
/// A `number` column whose values all fail to parse, or a `string` column
/// without values, degrades to `mixed`/`empty` rather than carrying empty stats.
fn column_stats(data_type: DataType, non_empty: &[&str]) -> ColumnStats {
    match data_type {
        DataType::Number => {
            let parsed: Vec<f64> = non_empty.iter().filter_map(|v| parse_number(v)).collect();
            match numeric_stats(&parsed) {
                Some(numeric_stats) => ColumnStats::Number { numeric_stats },
                None => ColumnStats::Mixed,
            }
        }
        DataType::String => match string_stats(non_empty) {
            Some(string_stats) => ColumnStats::String { string_stats },
            None => ColumnStats::Empty,
        },
        DataType::Date => ColumnStats::Date,
        DataType::Boolean => ColumnStats::Boolean,
        DataType::Mixed => ColumnStats::Mixed,
        DataType::Empty => ColumnStats::Empty,
    }
}

/// Profile one column.
///
/// Samples are the first non-empty values in row order; for number columns
/// only values that parse as finite numbers are sampled.
///
/// `values` holds the column's value for every data row (blank for rows
/// shorter than the header), so `values.len()` is the data row count.
pub fn profile_column(name: &str, index: usize, values: &[&str]) -> ColumnProfile {
    let total_rows = values.len();
    let non_empty: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !is_missing(v))
        .collect();

    let missing_values = total_rows - non_empty.len();
    let unique_values = non_empty.iter().collect::<HashSet<_>>().len();
    let data_type = infer_data_type(values.iter().copied());

    let stats = column_stats(data_type, &non_empty);

    // number columns only sample values that feed the numeric stats
    let sample_values = non_empty
        .iter()
        .filter(|v| !matches!(stats, ColumnStats::Number { .. }) || parse_number(v).is_some())
        .take(SAMPLE_SIZE)
        .map(|v| v.to_string())
        .collect();

    ColumnProfile {
        name: name.to_string(),
        index,
        stats,
        unique_values,
        missing_values,
        missing_percentage: percentage(missing_values, total_rows),
        sample_values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_numeric_stats_odd() {
        let stats = numeric_stats(&[3.0, 1.0, 2.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert!(approx(stats.mean, 2.0));
        assert!(approx(stats.median, 2.0));
        assert!(approx(stats.std_dev, (2.0f64 / 3.0).sqrt()));
    }

    #[test]
    fn test_numeric_stats_even_median() {
        let stats = numeric_stats(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert!(approx(stats.median, 2.5));
    }

    #[test]
    fn test_population_std_dev() {
        // population variance of 2,4,4,4,5,5,7,9 is exactly 4
        let stats = numeric_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!(approx(stats.std_dev, 2.0));
    }

    #[test]
    fn test_numeric_stats_near_f64_max() {
        let stats = numeric_stats(&[1e308, 1e308]).unwrap();
        assert_eq!(stats.mean, 1e308);
        assert_eq!(stats.median, 1e308);
        assert_eq!(stats.std_dev, 0.0);

        let stats = numeric_stats(&[-1.5e308, 1.5e308, 1.7e308]).unwrap();
        assert!(stats.mean.is_finite());
        assert_eq!(stats.median, 1.5e308);
        assert!(stats.std_dev.is_finite());
        assert!(stats.std_dev > 1e308);

        let stats = numeric_stats(&[-1.7e308, 1.7e308]).unwrap();
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.median, 0.0);
        assert!(approx(stats.std_dev / 1.7e308, 1.0));
    }

    #[test]
    fn test_numeric_stats_empty() {
        assert!(numeric_stats(&[]).is_none());
    }

    #[test]
    fn test_string_stats() {
        let stats = string_stats(&["a", "abc", "ab"]).unwrap();
        assert_eq!(stats.min_length, 1);
        assert_eq!(stats.max_length, 3);
        assert_eq!(stats.avg_length, 2.0);

        let stats = string_stats(&["ab", "a", "a"]).unwrap();
        assert_eq!(stats.avg_length, 1.33);
    }

    #[test]
    fn test_string_length_counts_chars() {
        let stats = string_stats(&["héllo"]).unwrap();
        assert_eq!(stats.max_length, 5);
    }

    #[test]
    fn test_profile_number_column() {
        let profile = profile_column("a", 0, &["1", "2", "3"]);

        assert_eq!(profile.data_type(), DataType::Number);
        let stats = profile.stats.numeric_stats().unwrap();
        assert!(approx(stats.mean, 2.0));
        assert!(approx(stats.median, 2.0));
        assert_eq!(profile.unique_values, 3);
        assert_eq!(profile.missing_values, 0);
    }

    #[test]
    fn test_profile_missing_and_samples() {
        let values = ["x", "", "y", "  ", "x", "z", "w", "v"];
        let profile = profile_column("b", 1, &values);

        assert_eq!(profile.data_type(), DataType::String);
        assert_eq!(profile.missing_values, 2);
        assert!(approx(profile.missing_percentage, 25.0));
        assert_eq!(profile.unique_values, 5);
        assert_eq!(profile.sample_values, vec!["x", "y", "x", "z", "w"]);
        assert!(profile.stats.string_stats().is_some());
    }

    #[test]
    fn test_profile_empty_column() {
        let profile = profile_column("c", 2, &["", ""]);
        assert_eq!(profile.data_type(), DataType::Empty);
        assert_eq!(profile.missing_values, 2);
        assert!(approx(profile.missing_percentage, 100.0));
        assert!(profile.sample_values.is_empty());
    }

    #[test]
    fn test_profile_no_rows() {
        let profile = profile_column("d", 0, &[]);
        assert_eq!(profile.data_type(), DataType::Empty);
        assert_eq!(profile.missing_percentage, 0.0);
    }

    #[test]
    fn test_number_samples_all_parse() {
        let profile = profile_column("n", 0, &["1", "2", "3", "4", "oops", "6"]);
        assert_eq!(profile.data_type(), DataType::Number);
        assert_eq!(profile.sample_values, vec!["1", "2", "3", "4", "6"]);
        assert!(profile.sample_values.iter().all(|v| parse_number(v).is_some()));
        let stats = profile.stats.numeric_stats().unwrap();
        assert_eq!(stats.max, 6.0);
        assert_eq!(profile.unique_values, 6);
    }
}
