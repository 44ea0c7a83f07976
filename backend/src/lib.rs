//! # clinqa - Quality assurance for clinical research CSV uploads
//!
//! clinqa profiles CSV files uploaded to a research data platform (clinical,
//! wearable and neuropsychological data) and produces a structured QA report:
//! structure, per-column types and statistics, missingness, duplicates and a
//! pass/fail verdict with human-readable errors and warnings.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV bytes  │────▶│   Parser    │────▶│  Analyzers  │────▶│  QaReport   │
//! │   (UTF-8)   │     │ (delimiter) │     │ (cols/rows) │     │ (pass/fail) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! The core (`parser`, `analysis`, `report`) is pure: no I/O besides reading
//! the input file, no logging, no shared state. The `pipeline` logs each stage
//! and hands finished reports to a `store`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use clinqa::{analyze_content, FileMeta, Modality};
//!
//! let report = analyze_content("id,age\n1,34\n2,\n", &FileMeta::new("visits.csv", 16), Some(Modality::Clinical));
//! assert!(report.is_valid);
//! println!("{}", clinqa::summary_line(&report));
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`config`] - Environment configuration
//! - [`models`] - Report model and domain enums
//! - [`parser`] - Delimiter detection and tokenization
//! - [`analysis`] - Type inference, column statistics, row checks, file-type detection
//! - [`report`] - Report assembly, scoring and rendering
//! - [`validation`] - JSON Schema validation of stored reports
//! - [`store`] - Upload-record persistence
//! - [`pipeline`] - Logged analysis runs
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing and analysis
pub mod analysis;
pub mod parser;
pub mod report;

// Validation
pub mod validation;

// Persistence
pub mod store;

// Orchestration
pub mod pipeline;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Errors and configuration
// =============================================================================

pub use config::Config;
pub use error::{ConfigError, QaError, ServerError, StoreError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    ColumnProfile, ColumnStats, DataType, FileMeta, FileType, Modality, NumericStats, QaReport,
    QaStatus, ReportSummary, ScoreGrade, StringStats,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{decode_content, detect_delimiter, tokenize, tokenize_line, RawTable};

// =============================================================================
// Re-exports - Report
// =============================================================================

pub use report::{
    analyze_bytes, analyze_content, analyze_content_at, analyze_file, format_file_size,
    qa_status, render_text, summary_line, validate_column_names, write_column_metrics_csv,
    QualityScores,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{is_valid_report_json, validate_report_json};

// =============================================================================
// Re-exports - Store and pipeline
// =============================================================================

pub use pipeline::{run_analysis, AnalysisInput, AnalysisOutcome};
pub use store::{ReportSink, ReportStore, SharedStore, UploadRecord, DEFAULT_LIST_LIMIT};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, AnalyzeResponse, RecordSummary};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
