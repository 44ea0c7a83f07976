//! Report assembly and pass/fail policy.
//!
//! Orchestrates delimiter detection, tokenization and every analyzer over a
//! single file, then merges their outputs into one [`QaReport`].
//!
//! # Policy
//!
//! 1. Empty or whitespace-only content fails with `File is empty`.
//! 2. Content that tokenizes to zero rows fails with `No rows found in CSV file`.
//! 3. Otherwise all analyzers run. Errors come from column-name validation
//!    and ragged rows; warnings from duplicate/irregular column names,
//!    duplicate rows, empty rows, high missingness and a header-only file.
//!
//! `is_valid` is exactly `errors.is_empty()`. None of the entry points return
//! an error or panic: I/O failures and internal faults become a failing report.
//!
//! Panics are caught with `catch_unwind`, which leaves the process panic hook
//! in place: the default hook still prints the panic message to stderr before
//! the failure report is returned. Binaries that want silence install their
//! own hook.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::analysis::{analyze_rows, detect_file_type, profile_column};
use crate::analysis::stats::percentage;
use crate::error::{QaError, QaResult};
use crate::models::report::UTF8_ENCODING;
use crate::models::{ColumnProfile, FileMeta, Modality, QaReport, ReportSummary};
use crate::parser::{decode_content, detect_delimiter, tokenize};

/// Missing-value percentage above which a warning is raised.
pub const MISSING_WARNING_THRESHOLD: f64 = 20.0;

static IRREGULAR_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_ \-]").expect("valid column name pattern"));

/// Errors and warnings raised by header validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameCheck {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Validate header names.
///
/// Empty names are one aggregate error; duplicate names are one aggregate
/// warning; each name with characters outside ASCII letters, digits, `_`, `-`
/// and the space character gets its own warning.
pub fn validate_column_names(names: &[String]) -> NameCheck {
    let mut check = NameCheck::default();

    let empty = names.iter().filter(|n| n.trim().is_empty()).count();
    if empty > 0 {
        check
            .errors
            .push(format!("Found {} empty column name(s)", empty));
    }

    let unique: HashSet<&String> = names.iter().collect();
    if unique.len() != names.len() {
        check.warnings.push("Found duplicate column names".to_string());
    }

    for name in names {
        if !name.is_empty() && IRREGULAR_NAME.is_match(name) {
            check
                .warnings
                .push(format!("Column \"{}\" contains special characters", name));
        }
    }

    check
}

/// Analyze CSV text. Timestamped with the current time.
pub fn analyze_content(content: &str, file: &FileMeta, modality: Option<Modality>) -> QaReport {
    analyze_content_at(content, file, modality, Utc::now())
}

/// Analyze CSV text with an explicit analysis timestamp.
pub fn analyze_content_at(
    content: &str,
    file: &FileMeta,
    modality: Option<Modality>,
    analyzed_at: DateTime<Utc>,
) -> QaReport {
    guarded(file, analyzed_at, || {
        build_report(content, file, modality, analyzed_at)
    })
}

/// Analyze raw upload bytes (decoded as UTF-8).
pub fn analyze_bytes(bytes: &[u8], file: &FileMeta, modality: Option<Modality>) -> QaReport {
    let content = decode_content(bytes);
    analyze_content(&content, file, modality)
}

/// Read and analyze a file on disk.
///
/// The file name is the path's final component; the size is the number of
/// bytes read.
pub fn analyze_file(path: &Path, modality: Option<Modality>) -> QaReport {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    match std::fs::read(path) {
        Ok(bytes) => analyze_bytes(&bytes, &FileMeta::new(name, bytes.len() as u64), modality),
        Err(e) => {
            let file = FileMeta::new(name, 0);
            QaReport::failure(&file, vec![QaError::from(e).report_message()], Utc::now())
        }
    }
}

/// Run `build`, folding errors and panics into a failure report.
fn guarded<F>(file: &FileMeta, analyzed_at: DateTime<Utc>, build: F) -> QaReport
where
    F: FnOnce() -> QaResult<QaReport>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(build))
        .unwrap_or_else(|payload| Err(QaError::Internal(panic_message(payload.as_ref()))));

    match outcome {
        Ok(report) => report,
        Err(err) => QaReport::failure(file, vec![err.report_message()], analyzed_at),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unexpected internal error".to_string()
    }
}

fn build_report(
    content: &str,
    file: &FileMeta,
    modality: Option<Modality>,
    analyzed_at: DateTime<Utc>,
) -> QaResult<QaReport> {
    if content.trim().is_empty() {
        return Err(QaError::EmptyFile);
    }

    let delimiter = detect_delimiter(content);
    let table = tokenize(content, delimiter);
    if table.is_empty() {
        return Err(QaError::NoRows);
    }

    let column_names = table.header().to_vec();
    let data_rows = table.data_rows();
    let total_rows = data_rows.len();
    let total_columns = column_names.len();

    let file_type = detect_file_type(&column_names, modality);

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let names = validate_column_names(&column_names);
    errors.extend(names.errors);
    warnings.extend(names.warnings);

    if data_rows.is_empty() {
        warnings.push("CSV file contains only header row, no data".to_string());
    }

    // Columns
    let column_metrics: Vec<ColumnProfile> = column_names
        .iter()
        .enumerate()
        .map(|(index, name)| profile_column(name, index, &table.column_values(index)))
        .collect();

    let missing_values_by_index: Vec<usize> =
        column_metrics.iter().map(|c| c.missing_values).collect();
    let missing_values_count: usize = missing_values_by_index.iter().sum();
    let missing_values_by_column: IndexMap<String, usize> = column_metrics
        .iter()
        .map(|c| (c.name.clone(), c.missing_values))
        .collect();

    // Rows
    let rows = analyze_rows(data_rows, total_columns);

    if rows.duplicate_rows > 0 {
        warnings.push(format!("Found {} duplicate row(s)", rows.duplicate_rows));
    }
    if rows.empty_rows > 0 {
        warnings.push(format!("Found {} completely empty row(s)", rows.empty_rows));
    }

    let missing_values_percentage = percentage(missing_values_count, total_rows * total_columns);
    if missing_values_percentage > MISSING_WARNING_THRESHOLD {
        warnings.push(format!(
            "High percentage of missing values: {:.2}%",
            missing_values_percentage
        ));
    }

    errors.extend(rows.errors);

    Ok(QaReport {
        file_name: file.name.clone(),
        file_size: file.size,
        encoding: UTF8_ENCODING.to_string(),
        file_type: Some(file_type),
        total_rows,
        total_columns,
        column_names,
        delimiter,
        has_header: true,
        missing_values_count,
        missing_values_by_column,
        missing_values_by_index,
        missing_values_percentage,
        duplicate_rows_count: rows.duplicate_rows,
        duplicate_rows_percentage: percentage(rows.duplicate_rows, total_rows),
        column_metrics,
        is_valid: errors.is_empty(),
        errors,
        warnings,
        summary: ReportSummary {
            empty_rows: rows.empty_rows,
            complete_rows: rows.complete_rows,
            average_field_length: rows.average_field_length,
        },
        analyzed_at,
    })
}
