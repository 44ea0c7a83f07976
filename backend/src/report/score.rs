//! Quality scores and the upload-record verdict derived from a report.

use serde::{Deserialize, Serialize};

use crate::models::{ColumnProfile, QaReport, QaStatus, ScoreGrade};

/// Column missing percentage above which the column is highlighted.
pub const HIGH_COLUMN_MISSING_PERCENTAGE: f64 = 20.0;

/// Duplicate-row percentage above which duplicates are highlighted.
pub const HIGH_DUPLICATE_PERCENTAGE: f64 = 5.0;

/// 0-100 scores shown next to a report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityScores {
    /// 100 minus the missing-value percentage
    pub completeness: f64,
    /// 100 minus the duplicate-row percentage
    pub uniqueness: f64,
    /// Mean of completeness and uniqueness
    pub overall: f64,
    pub grade: ScoreGrade,
}

impl QualityScores {
    pub fn from_report(report: &QaReport) -> Self {
        let completeness = 100.0 - report.missing_values_percentage;
        let uniqueness = 100.0 - report.duplicate_rows_percentage;
        let overall = (completeness + uniqueness) / 2.0;

        Self {
            completeness,
            uniqueness,
            overall,
            grade: ScoreGrade::from_score(overall),
        }
    }
}

/// Verdict for the upload record: failed, passed with warnings, or passed.
pub fn qa_status(report: &QaReport) -> QaStatus {
    if !report.is_valid {
        QaStatus::Failed
    } else if report.has_warnings() {
        QaStatus::PassedWithWarnings
    } else {
        QaStatus::Passed
    }
}

pub fn is_high_missing(column: &ColumnProfile) -> bool {
    column.missing_percentage > HIGH_COLUMN_MISSING_PERCENTAGE
}

pub fn is_high_duplication(report: &QaReport) -> bool {
    report.duplicate_rows_percentage > HIGH_DUPLICATE_PERCENTAGE
}
