//! Analysis pipeline: runs the QA core over one upload, logs each stage and
//! optionally persists the result.
//!
//! # Example
//!
//! ```rust,ignore
//! use clinqa::pipeline::{run_analysis, AnalysisInput};
//! use clinqa::store::ReportStore;
//!
//! let mut store = ReportStore::with_dir(".clinqa/reports");
//! let input = AnalysisInput::from_path("visits.csv", Some(Modality::Clinical));
//! let outcome = run_analysis(input, Some(&mut store));
//! println!("{} -> {:?}", outcome.report.file_name, outcome.record_id);
//! ```

use std::path::PathBuf;
use uuid::Uuid;

use crate::api::logs::{log_error, log_info, log_success, log_warning};
use crate::models::{FileMeta, Modality, QaReport, QaStatus};
use crate::report::{analyze_bytes, analyze_file, qa_status, summary_line, QualityScores};
use crate::store::ReportSink;

/// Where the bytes of an upload come from.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Bytes already in memory (HTTP upload)
    Bytes { file: FileMeta, bytes: Vec<u8> },
    /// File on disk, read by the analyzer
    Path(PathBuf),
}

/// One file to analyze.
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub source: InputSource,
    pub modality: Option<Modality>,
}

impl AnalysisInput {
    pub fn from_bytes(
        name: impl Into<String>,
        bytes: Vec<u8>,
        modality: Option<Modality>,
    ) -> Self {
        let file = FileMeta::new(name, bytes.len() as u64);
        Self {
            source: InputSource::Bytes { file, bytes },
            modality,
        }
    }

    pub fn from_path(path: impl Into<PathBuf>, modality: Option<Modality>) -> Self {
        Self {
            source: InputSource::Path(path.into()),
            modality,
        }
    }
}

/// Result of [`run_analysis`].
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: QaReport,
    /// Set when the report was persisted
    pub record_id: Option<Uuid>,
    /// Set when persistence was requested and failed
    pub persist_error: Option<String>,
}

impl AnalysisOutcome {
    pub fn status(&self) -> QaStatus {
        qa_status(&self.report)
    }
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        other => other.to_string(),
    }
}

/// Analyze one input and hand the report to `sink` when given.
///
/// Never fails: analysis problems end up in the report, persistence problems
/// in `persist_error`.
pub fn run_analysis(input: AnalysisInput, sink: Option<&mut dyn ReportSink>) -> AnalysisOutcome {
    let modality = input.modality;

    let report = match input.source {
        InputSource::Bytes { file, bytes } => {
            log_info(format!("📖 Analyzing {} ({} bytes)", file.name, file.size));
            analyze_bytes(&bytes, &file, modality)
        }
        InputSource::Path(path) => {
            log_info(format!("📖 Analyzing {}", path.display()));
            analyze_file(&path, modality)
        }
    };

    log_report(&report);

    let mut outcome = AnalysisOutcome {
        report,
        record_id: None,
        persist_error: None,
    };

    if let Some(sink) = sink {
        log_info("💾 Saving upload record...");
        match sink.save(&outcome.report, modality.unwrap_or(Modality::Unknown)) {
            Ok(id) => {
                log_success(format!("Saved record {}", id));
                outcome.record_id = Some(id);
            }
            Err(e) => {
                log_error(format!("Failed to save record: {}", e));
                outcome.persist_error = Some(e.to_string());
            }
        }
    }

    outcome
}

fn log_report(report: &QaReport) {
    if report.total_columns > 0 {
        log_success(format!(
            "Detected separator: '{}'",
            format_delimiter(report.delimiter)
        ));
        log_success(format!(
            "Read {} rows, {} columns",
            report.total_rows, report.total_columns
        ));
    }
    if let Some(file_type) = report.file_type {
        log_info(format!("File type: {}", file_type));
    }

    for error in &report.errors {
        log_error(error.clone());
    }
    for warning in &report.warnings {
        log_warning(warning.clone());
    }

    let scores = QualityScores::from_report(report);
    let status = qa_status(report);
    let message = format!(
        "QA {} (score {:.1}): {}",
        status,
        scores.overall,
        summary_line(report)
    );
    match status {
        QaStatus::Passed => log_success(message),
        QaStatus::PassedWithWarnings => log_warning(message),
        QaStatus::Failed => log_error(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StoreError, StoreResult};
    use crate::store::ReportStore;
    use tempfile::tempdir;

    struct FailingSink;

    impl ReportSink for FailingSink {
        fn save(&mut self, _report: &QaReport, _modality: Modality) -> StoreResult<Uuid> {
            Err(StoreError::NotFound("disk".into()))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        saved: Vec<(String, Modality)>,
    }

    impl ReportSink for RecordingSink {
        fn save(&mut self, report: &QaReport, modality: Modality) -> StoreResult<Uuid> {
            self.saved.push((report.file_name.clone(), modality));
            Ok(Uuid::new_v4())
        }
    }

    #[test]
    fn test_run_without_sink() {
        let input = AnalysisInput::from_bytes("a.csv", b"a,b\n1,2\n".to_vec(), None);
        let outcome = run_analysis(input, None);

        assert!(outcome.report.is_valid);
        assert_eq!(outcome.report.file_size, 8);
        assert_eq!(outcome.status(), QaStatus::Passed);
        assert!(outcome.record_id.is_none());
        assert!(outcome.persist_error.is_none());
    }

    #[test]
    fn test_sink_receives_report_and_modality() {
        let mut sink = RecordingSink::default();
        let input = AnalysisInput::from_bytes(
            "steps.csv",
            b"id,steps\n1,100\n".to_vec(),
            Some(Modality::Wearable),
        );
        let outcome = run_analysis(input, Some(&mut sink));

        assert!(outcome.record_id.is_some());
        assert_eq!(sink.saved, vec![("steps.csv".to_string(), Modality::Wearable)]);
    }

    #[test]
    fn test_persist_failure_keeps_report() {
        let input = AnalysisInput::from_bytes("a.csv", b"a,b\n1,2\n".to_vec(), None);
        let expected = run_analysis(input.clone(), None).report;

        let outcome = run_analysis(input, Some(&mut FailingSink));
        assert!(outcome.record_id.is_none());
        assert!(outcome.persist_error.unwrap().contains("disk"));
        assert_eq!(outcome.report.errors, expected.errors);
        assert_eq!(outcome.report.warnings, expected.warnings);
        assert!(outcome.report.is_valid);
    }

    #[test]
    fn test_failed_report_is_persisted() {
        let dir = tempdir().unwrap();
        let mut store = ReportStore::with_dir(dir.path());
        let input = AnalysisInput::from_bytes("empty.csv", Vec::new(), Some(Modality::Clinical));

        let outcome = run_analysis(input, Some(&mut store));
        let id = outcome.record_id.unwrap();
        let record = store.get(&id.to_string()).unwrap();
        assert_eq!(record.qa_status, QaStatus::Failed);
    }

    #[test]
    fn test_path_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("labs.csv");
        std::fs::write(&path, "id;value\n1;2.5\n").unwrap();

        let outcome = run_analysis(AnalysisInput::from_path(&path, None), None);
        assert_eq!(outcome.report.file_name, "labs.csv");
        assert_eq!(outcome.report.delimiter, ';');
        assert!(outcome.report.is_valid);
    }
}
