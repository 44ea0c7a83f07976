//! File-type fingerprinting from header names.
//!
//! A coarse heuristic: known exports are recognised when enough of their
//! signature columns are present. Below-threshold files of a known kind are
//! reported as the modality's unknown sub-type.

use std::collections::HashSet;

use crate::models::{FileType, Modality};

/// Columns of the Fitbit sleep export.
pub const FITBIT_SIGNATURE: [&str; 6] = [
    "id",
    "num_jour",
    "date_jour",
    "heure_endor",
    "duree_sommeil",
    "score_sommeil",
];

/// Columns of the wearable-study intake questionnaire.
pub const QUESTIONNAIRE_SIGNATURE: [&str; 7] = [
    "identification.id",
    "age",
    "sex",
    "height",
    "weight",
    "shaps_q1",
    "isi_q1",
];

/// Signature columns that must be present to claim a sub-type.
pub const SIGNATURE_MATCH_THRESHOLD: usize = 4;

fn normalize_headers(columns: &[String]) -> HashSet<String> {
    columns.iter().map(|c| c.trim().to_lowercase()).collect()
}

/// Count how many signature columns appear in the normalized header set.
pub fn signature_matches(headers: &HashSet<String>, signature: &[&str]) -> usize {
    signature.iter().filter(|col| headers.contains(**col)).count()
}

/// Classify a file from its header and declared modality.
pub fn detect_file_type(columns: &[String], modality: Option<Modality>) -> FileType {
    match modality {
        Some(Modality::Clinical) => FileType::ClinicalGeneric,
        Some(Modality::Neuropsychological) => FileType::NeuropsychologicalGeneric,
        Some(Modality::Wearable) => {
            let headers = normalize_headers(columns);

            if signature_matches(&headers, &FITBIT_SIGNATURE) >= SIGNATURE_MATCH_THRESHOLD {
                FileType::WearableFitbit
            } else if signature_matches(&headers, &QUESTIONNAIRE_SIGNATURE)
                >= SIGNATURE_MATCH_THRESHOLD
            {
                FileType::WearableQuestionnaire
            } else {
                FileType::WearableUnknown
            }
        }
        _ => FileType::Unknown,
    }
}
