//! Domain enums shared across the analysis pipeline.
//!
//! - [`Modality`] - category of research data declared for an upload
//! - [`FileType`] - coarse file fingerprint produced by the classifier
//! - [`DataType`] - inferred type of one CSV column
//! - [`QaStatus`] - upload-record verdict derived from a report
//! - [`ScoreGrade`] - banding of quality scores
//!
//! The report data model itself lives in [`report`].

pub mod report;

pub use report::{
    ColumnProfile, ColumnStats, FileMeta, NumericStats, QaReport, ReportSummary, StringStats,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Modality
// =============================================================================

/// Category of clinical data a file represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Clinical,
    Wearable,
    Neuropsychological,
    Mri,
    Genomic,
    Unknown,
}

impl Modality {
    /// Modalities uploaded as CSV and therefore run through QA.
    pub const CSV_MODALITIES: [Modality; 3] = [
        Modality::Clinical,
        Modality::Wearable,
        Modality::Neuropsychological,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clinical => "clinical",
            Self::Wearable => "wearable",
            Self::Neuropsychological => "neuropsychological",
            Self::Mri => "mri",
            Self::Genomic => "genomic",
            Self::Unknown => "unknown",
        }
    }

    /// Whether files of this modality are CSV.
    pub fn is_csv(&self) -> bool {
        Self::CSV_MODALITIES.contains(self)
    }
}

impl FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clinical" => Ok(Self::Clinical),
            "wearable" => Ok(Self::Wearable),
            "neuropsychological" => Ok(Self::Neuropsychological),
            "mri" => Ok(Self::Mri),
            "genomic" => Ok(Self::Genomic),
            "unknown" | "" => Ok(Self::Unknown),
            other => Err(format!("Unknown modality: {}", other)),
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// File Type
// =============================================================================

/// File-type tag used for downstream filtering and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    #[serde(rename = "clinical-generic")]
    ClinicalGeneric,
    /// Fitbit sleep export
    #[serde(rename = "wearable-fitbit")]
    WearableFitbit,
    #[serde(rename = "wearable-questionnaire")]
    WearableQuestionnaire,
    #[serde(rename = "wearable-unknown")]
    WearableUnknown,
    #[serde(rename = "neuropsychological-generic")]
    NeuropsychologicalGeneric,
    #[serde(rename = "unknown")]
    Unknown,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClinicalGeneric => "clinical-generic",
            Self::WearableFitbit => "wearable-fitbit",
            Self::WearableQuestionnaire => "wearable-questionnaire",
            Self::WearableUnknown => "wearable-unknown",
            Self::NeuropsychologicalGeneric => "neuropsychological-generic",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Data Type
// =============================================================================

/// Dominant data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Number,
    Date,
    Boolean,
    Mixed,
    Empty,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Mixed => "mixed",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// QA Status
// =============================================================================

/// Verdict stored alongside an upload record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QaStatus {
    Passed,
    PassedWithWarnings,
    Failed,
}

impl QaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::PassedWithWarnings => "passed_with_warnings",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for QaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Score Grade
// =============================================================================

/// Band of a 0-100 quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreGrade {
    Good,
    Fair,
    Poor,
}

impl ScoreGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Good
        } else if score >= 70.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl fmt::Display for ScoreGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
