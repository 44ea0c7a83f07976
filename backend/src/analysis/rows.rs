//! Row-level quality checks: duplicates, empty and complete rows, ragged rows.

use std::collections::HashSet;

use super::infer::is_missing;
use super::stats::round2;

/// Outcome of the row-level pass over the data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowAnalysis {
    /// Rows identical to an earlier row
    pub duplicate_rows: usize,
    /// Rows whose fields are all blank
    pub empty_rows: usize,
    /// Rows whose fields are all non-blank
    pub complete_rows: usize,
    /// Concatenated field length per cell, rounded to 2 decimals
    pub average_field_length: f64,
    /// Rows whose field count differs from the header's
    pub inconsistent_rows: usize,
    /// Structural errors (at most one aggregate message)
    pub errors: Vec<String>,
}

/// Number of rows that repeat an earlier row exactly.
pub fn count_duplicate_rows(rows: &[Vec<String>]) -> usize {
    let distinct: HashSet<&[String]> = rows.iter().map(Vec::as_slice).collect();
    rows.len() - distinct.len()
}

/// Analyze the data rows (header excluded) against the header's column count.
pub fn analyze_rows(rows: &[Vec<String>], column_count: usize) -> RowAnalysis {
    let empty_rows = rows
        .iter()
        .filter(|row| row.iter().all(|cell| is_missing(cell)))
        .count();

    let complete_rows = rows
        .iter()
        .filter(|row| row.iter().all(|cell| !is_missing(cell)))
        .count();

    let total_chars: usize = rows
        .iter()
        .flat_map(|row| row.iter())
        .map(|cell| cell.chars().count())
        .sum();
    let cell_count = rows.len() * column_count;
    let average_field_length = if cell_count == 0 {
        0.0
    } else {
        round2(total_chars as f64 / cell_count as f64)
    };

    let inconsistent_rows = rows.iter().filter(|row| row.len() != column_count).count();

    let mut errors = Vec::new();
    if inconsistent_rows > 0 {
        errors.push(format!(
            "Found {} row(s) with inconsistent column count",
            inconsistent_rows
        ));
    }

    RowAnalysis {
        duplicate_rows: count_duplicate_rows(rows),
        empty_rows,
        complete_rows,
        average_field_length,
        inconsistent_rows,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_duplicates_counted_after_first() {
        let data = rows(&[&["1", "x"], &["1", "x"], &["2", "y"], &["1", "x"]]);
        assert_eq!(count_duplicate_rows(&data), 2);
    }

    #[test]
    fn test_no_duplicates() {
        let data = rows(&[&["1", "x"], &["2", "y"]]);
        assert_eq!(count_duplicate_rows(&data), 0);
        assert_eq!(count_duplicate_rows(&[]), 0);
    }

    #[test]
    fn test_field_boundaries_matter_for_duplicates() {
        // same concatenation, different fields
        let data = rows(&[&["ab", "c"], &["a", "bc"]]);
        assert_eq!(count_duplicate_rows(&data), 0);
    }

    #[test]
    fn test_empty_and_complete_rows() {
        let data = rows(&[&["1", "x"], &["", " "], &["3", ""]]);
        let analysis = analyze_rows(&data, 2);

        assert_eq!(analysis.empty_rows, 1);
        assert_eq!(analysis.complete_rows, 1);
        assert!(analysis.errors.is_empty());
    }

    #[test]
    fn test_inconsistent_rows_single_aggregate_error() {
        let data = rows(&[&["1", "2"], &["3"], &["4", "5", "6"]]);
        let analysis = analyze_rows(&data, 2);

        assert_eq!(analysis.inconsistent_rows, 2);
        assert_eq!(
            analysis.errors,
            vec!["Found 2 row(s) with inconsistent column count".to_string()]
        );
    }

    #[test]
    fn test_average_field_length() {
        // 1 + 1 + 1 + 3 characters over 4 cells
        let data = rows(&[&["1", "x"], &["2", "yyy"]]);
        let analysis = analyze_rows(&data, 2);
        assert_eq!(analysis.average_field_length, 1.5);
    }

    #[test]
    fn test_no_rows() {
        let analysis = analyze_rows(&[], 3);
        assert_eq!(analysis, RowAnalysis::default());
    }
}
