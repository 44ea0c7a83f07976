//! REST API types for frontend integration.
//!
//! Reports are returned in the same camelCase JSON shape they are stored in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::{Modality, QaReport, QaStatus};
use crate::pipeline::AnalysisOutcome;
use crate::report::{format_file_size, summary_line, QualityScores};
use crate::store::UploadRecord;

/// Response sent to the frontend after a CSV upload is analyzed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Upload record id, when the report was saved
    pub record_id: Option<Uuid>,
    pub status: QaStatus,
    pub score: QualityScores,
    /// One-line digest of the report
    pub summary: String,
    pub report: QaReport,
    /// Why saving failed, when it was requested and did not succeed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persist_error: Option<String>,
}

impl From<AnalysisOutcome> for AnalyzeResponse {
    fn from(outcome: AnalysisOutcome) -> Self {
        AnalyzeResponse {
            record_id: outcome.record_id,
            status: outcome.status(),
            score: QualityScores::from_report(&outcome.report),
            summary: summary_line(&outcome.report),
            report: outcome.report,
            persist_error: outcome.persist_error,
        }
    }
}

/// An upload record as listed, without the report blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    pub id: Uuid,
    pub file_name: String,
    pub file_size: u64,
    /// Human-readable size, e.g. `1.5 MB`
    pub file_size_label: String,
    pub modality: Modality,
    pub qa_status: QaStatus,
    pub qa_score: f64,
    pub qa_completed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<&UploadRecord> for RecordSummary {
    fn from(record: &UploadRecord) -> Self {
        RecordSummary {
            id: record.id,
            file_name: record.file_name.clone(),
            file_size: record.file_size,
            file_size_label: format_file_size(record.file_size),
            modality: record.modality,
            qa_status: record.qa_status,
            qa_score: record.qa_score,
            qa_completed_at: record.qa_completed_at,
            created_at: record.created_at,
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "status": "error",
        "error": error,
    })
}
