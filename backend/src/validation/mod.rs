//! JSON Schema validation for stored QA reports.
//!
//! Reports read back from disk or handed to `clinqa check-report` are checked
//! against `schemas/qa-report.json` (Draft 7), embedded at compile time.
//!
//! # Example
//!
//! ```rust,ignore
//! use clinqa::validation::validate_report_json;
//!
//! let value = serde_json::to_value(&report)?;
//! assert!(validate_report_json(&value).is_ok());
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

static QA_REPORT_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/qa-report.json"))
        .expect("Invalid embedded schema")
});

/// Validate a JSON value against a Draft 7 schema.
///
/// Returns every violation, one message per error.
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator =
        jsonschema::draft7::new(schema).map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// Validate against the QA report schema.
pub fn validate_report_json(data: &Value) -> Result<(), Vec<String>> {
    validate(&QA_REPORT_SCHEMA, data)
}

/// Quick check against the QA report schema.
pub fn is_valid_report_json(data: &Value) -> bool {
    is_valid(&QA_REPORT_SCHEMA, data)
}
