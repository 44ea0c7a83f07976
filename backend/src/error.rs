//! Error types for the clinqa analysis backend.
//!
//! This module defines one error type per layer:
//!
//! - [`QaError`] - failures inside a single analysis pass
//! - [`StoreError`] - upload-record persistence errors
//! - [`ConfigError`] - invalid environment configuration
//! - [`ServerError`] - HTTP layer errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Note that the public analysis entry points never return a [`QaError`]:
//! the report assembler folds every error into a failing report.

use thiserror::Error;

// =============================================================================
// Analysis Errors
// =============================================================================

/// Errors raised while analyzing one file.
#[derive(Debug, Error)]
pub enum QaError {
    /// Content is empty or whitespace-only.
    #[error("File is empty")]
    EmptyFile,

    /// Tokenization produced no rows.
    #[error("No rows found in CSV file")]
    NoRows,

    /// Failed to read the file.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Unexpected fault inside the analysis pass.
    #[error("{0}")]
    Internal(String),
}

impl QaError {
    /// Message placed in the failure report's error list.
    pub fn report_message(&self) -> String {
        match self {
            QaError::EmptyFile | QaError::NoRows => self.to_string(),
            other => format!("Failed to analyze CSV: {}", other),
        }
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the upload-record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record not found.
    #[error("Upload record not found: {0}")]
    NotFound(String),

    /// Stored report blob does not match the report schema.
    #[error("Stored report is invalid: {}", .0.join("; "))]
    InvalidReport(Vec<String>),

    /// IO error.
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("Store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Variable is set but cannot be parsed.
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for analysis internals.
pub type QaResult<T> = Result<T, QaError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
