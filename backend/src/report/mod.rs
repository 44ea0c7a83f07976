//! Turns a CSV upload into a [`QaReport`](crate::models::QaReport) and
//! derives the views shown to users.
//!
//! - `assemble`: the analysis entry points and pass/fail policy
//! - `score`: quality scores and the record verdict
//! - `render`: summary line, text report and column metrics CSV

pub mod assemble;
pub mod render;
pub mod score;

pub use assemble::{
    analyze_bytes, analyze_content, analyze_content_at, analyze_file, validate_column_names,
    NameCheck, MISSING_WARNING_THRESHOLD,
};
pub use render::{format_file_size, render_text, summary_line, write_column_metrics_csv};
pub use score::{qa_status, QualityScores};
