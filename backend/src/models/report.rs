//! QA report data model.
//!
//! [`QaReport`] is the aggregate produced by one analysis pass. It owns its
//! [`ColumnProfile`]s and serializes to camelCase JSON so it can be stored as
//! an opaque blob and read back for display.
//!
//! Per-column statistics are a tagged union keyed by `dataType`: only number
//! columns carry `numericStats` and only string columns carry `stringStats`.
//!
//! ```json
//! { "name": "age", "index": 0, "dataType": "number",
//!   "numericStats": { "min": 21, "max": 64, "mean": 40.5, "median": 39, "stdDev": 12.1 },
//!   "uniqueValues": 10, "missingValues": 0, "missingPercentage": 0, "sampleValues": ["21", "64"] }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;

use super::{DataType, FileType};

/// Encoding recorded for analyzed files.
pub const UTF8_ENCODING: &str = "UTF-8";

/// Encoding recorded on failure reports.
pub const UNKNOWN_ENCODING: &str = "unknown";

// =============================================================================
// Column Profile
// =============================================================================

/// Distribution of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

/// Character lengths of a string column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringStats {
    pub min_length: usize,
    pub max_length: usize,
    /// Mean length, rounded to 2 decimals
    pub avg_length: f64,
}

/// Inferred type of a column, with the statistics that type carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dataType", rename_all = "lowercase")]
pub enum ColumnStats {
    String {
        #[serde(rename = "stringStats")]
        string_stats: StringStats,
    },
    Number {
        #[serde(rename = "numericStats")]
        numeric_stats: NumericStats,
    },
    Date,
    Boolean,
    Mixed,
    Empty,
}

impl ColumnStats {
    pub fn data_type(&self) -> DataType {
        match self {
            Self::String { .. } => DataType::String,
            Self::Number { .. } => DataType::Number,
            Self::Date => DataType::Date,
            Self::Boolean => DataType::Boolean,
            Self::Mixed => DataType::Mixed,
            Self::Empty => DataType::Empty,
        }
    }

    pub fn numeric_stats(&self) -> Option<&NumericStats> {
        match self {
            Self::Number { numeric_stats } => Some(numeric_stats),
            _ => None,
        }
    }

    pub fn string_stats(&self) -> Option<&StringStats> {
        match self {
            Self::String { string_stats } => Some(string_stats),
            _ => None,
        }
    }
}

/// Profile of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    /// Header name; may be empty or repeated
    pub name: String,
    pub index: usize,
    #[serde(flatten)]
    pub stats: ColumnStats,
    /// Distinct non-empty values
    pub unique_values: usize,
    pub missing_values: usize,
    pub missing_percentage: f64,
    /// First five non-empty values, in row order
    pub sample_values: Vec<String>,
}

impl ColumnProfile {
    pub fn data_type(&self) -> DataType {
        self.stats.data_type()
    }
}

// =============================================================================
// QA Report
// =============================================================================

/// Row-level summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub empty_rows: usize,
    pub complete_rows: usize,
    pub average_field_length: f64,
}

/// Identity of the analyzed file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub name: String,
    /// Declared size in bytes
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Structured output of one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaReport {
    // File-level
    pub file_name: String,
    pub file_size: u64,
    pub encoding: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileType>,

    // Structure
    /// Data rows, header excluded
    pub total_rows: usize,
    pub total_columns: usize,
    pub column_names: Vec<String>,
    pub delimiter: char,
    pub has_header: bool,

    // Data quality
    pub missing_values_count: usize,
    /// Name-keyed in header order; on duplicate names the last column's count wins
    pub missing_values_by_column: IndexMap<String, usize>,
    /// Index-aligned with `column_names`
    #[serde(default)]
    pub missing_values_by_index: Vec<usize>,
    pub missing_values_percentage: f64,
    pub duplicate_rows_count: usize,
    pub duplicate_rows_percentage: f64,

    // Columns
    pub column_metrics: Vec<ColumnProfile>,

    // Verdict
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,

    pub summary: ReportSummary,
    pub analyzed_at: DateTime<Utc>,
}

impl QaReport {
    /// Report for a file that could not be analyzed: no structure, one or more errors.
    pub fn failure(file: &FileMeta, errors: Vec<String>, analyzed_at: DateTime<Utc>) -> Self {
        Self {
            file_name: file.name.clone(),
            file_size: file.size,
            encoding: UNKNOWN_ENCODING.to_string(),
            file_type: None,
            total_rows: 0,
            total_columns: 0,
            column_names: Vec::new(),
            delimiter: ',',
            has_header: false,
            missing_values_count: 0,
            missing_values_by_column: IndexMap::new(),
            missing_values_by_index: Vec::new(),
            missing_values_percentage: 0.0,
            duplicate_rows_count: 0,
            duplicate_rows_percentage: 0.0,
            column_metrics: Vec::new(),
            is_valid: errors.is_empty(),
            errors,
            warnings: Vec::new(),
            summary: ReportSummary::default(),
            analyzed_at,
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Look up a column profile by header name (first match).
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.column_metrics.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number_profile() -> ColumnProfile {
        ColumnProfile {
            name: "age".into(),
            index: 0,
            stats: ColumnStats::Number {
                numeric_stats: NumericStats {
                    min: 1.0,
                    max: 3.0,
                    mean: 2.0,
                    median: 2.0,
                    std_dev: 0.816496580927726,
                },
            },
            unique_values: 3,
            missing_values: 0,
            missing_percentage: 0.0,
            sample_values: vec!["1".into(), "2".into(), "3".into()],
        }
    }

    #[test]
    fn test_column_profile_json_shape() {
        let value = serde_json::to_value(number_profile()).unwrap();

        assert_eq!(value["dataType"], "number");
        assert_eq!(value["numericStats"]["mean"], 2.0);
        assert!(value["numericStats"].get("stdDev").is_some());
        assert!(value.get("stringStats").is_none());
        assert_eq!(value["uniqueValues"], 3);
    }

    #[test]
    fn test_boolean_column_has_no_stats() {
        let value = json!({
            "name": "flag", "index": 1, "dataType": "boolean",
            "uniqueValues": 2, "missingValues": 0, "missingPercentage": 0.0,
            "sampleValues": ["yes", "no"]
        });
        let profile: ColumnProfile = serde_json::from_value(value).unwrap();

        assert_eq!(profile.data_type(), DataType::Boolean);
        assert!(profile.stats.numeric_stats().is_none());
        assert!(profile.stats.string_stats().is_none());
    }

    #[test]
    fn test_number_column_without_stats_is_rejected() {
        let value = json!({
            "name": "age", "index": 0, "dataType": "number",
            "uniqueValues": 1, "missingValues": 0, "missingPercentage": 0.0,
            "sampleValues": ["1"]
        });
        assert!(serde_json::from_value::<ColumnProfile>(value).is_err());
    }

    #[test]
    fn test_failure_report_is_invalid() {
        let file = FileMeta::new("empty.csv", 0);
        let report = QaReport::failure(&file, vec!["File is empty".into()], Utc::now());

        assert!(!report.is_valid);
        assert_eq!(report.encoding, "unknown");
        assert!(!report.has_header);

        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("fileType").is_none());
        assert_eq!(value["isValid"], false);
        assert_eq!(value["errors"][0], "File is empty");
    }
}
