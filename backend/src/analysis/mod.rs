//! Analyzers that run over a tokenized [`RawTable`](crate::parser::RawTable).
//!
//! - `infer`: column type inference
//! - `stats`: per-column statistics
//! - `classify`: file-type fingerprinting from header names
//! - `rows`: row-level quality checks
//!
//! Each analyzer only reads the table; column analyzers depend only on their
//! own column's values and can run in any order.

pub mod classify;
pub mod infer;
pub mod rows;
pub mod stats;

pub use classify::detect_file_type;
pub use infer::{infer_data_type, TypeCounts};
pub use rows::{analyze_rows, count_duplicate_rows, RowAnalysis};
pub use stats::{numeric_stats, profile_column, string_stats};
