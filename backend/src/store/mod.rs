//! Upload-record store: persists analyzed reports to disk.
//!
//! Each record is one JSON file named `<id>.json` under the report directory.
//! Records are loaded into memory when the store is opened.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::models::{Modality, QaReport, QaStatus};
use crate::report::{qa_status, QualityScores};
use crate::validation::validate_report_json;

/// Default page size for [`ReportStore::list`].
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// A persisted analysis of one upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    pub id: Uuid,
    pub file_name: String,
    pub file_size: u64,
    pub modality: Modality,
    pub qa_status: QaStatus,
    /// Overall quality score, 0-100
    pub qa_score: f64,
    /// Serialized [`QaReport`], kept opaque until read back
    pub qa_report: Value,
    pub qa_completed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl UploadRecord {
    pub fn from_report(report: &QaReport, modality: Modality) -> StoreResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            file_name: report.file_name.clone(),
            file_size: report.file_size,
            modality,
            qa_status: qa_status(report),
            qa_score: QualityScores::from_report(report).overall,
            qa_report: serde_json::to_value(report)?,
            qa_completed_at: report.analyzed_at,
            created_at: Utc::now(),
        })
    }
}

/// Destination for finished reports.
pub trait ReportSink {
    /// Persist a report and return the new record's id.
    fn save(&mut self, report: &QaReport, modality: Modality) -> StoreResult<Uuid>;
}

/// File-backed store of upload records.
pub struct ReportStore {
    dir: PathBuf,
    records: HashMap<Uuid, UploadRecord>,
}

impl ReportStore {
    /// Open the store at the configured report directory.
    pub fn new(config: &Config) -> Self {
        Self::with_dir(&config.report_dir)
    }

    /// Open a store rooted at a custom directory.
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        let mut store = Self {
            dir: dir.as_ref().to_path_buf(),
            records: HashMap::new(),
        };
        store.load_all();
        store
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // Unreadable or foreign files are skipped.
    fn load_all(&mut self) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(e) => e,
            Err(_) => return,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                if let Ok(content) = fs::read_to_string(&path) {
                    if let Ok(record) = serde_json::from_str::<UploadRecord>(&content) {
                        self.records.insert(record.id, record);
                    }
                }
            }
        }
    }

    fn record_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn parse_id(id: &str) -> StoreResult<Uuid> {
        Uuid::parse_str(id.trim()).map_err(|_| StoreError::NotFound(id.to_string()))
    }

    pub fn get(&self, id: &str) -> StoreResult<&UploadRecord> {
        let uuid = Self::parse_id(id)?;
        self.records
            .get(&uuid)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Records of CSV modalities, newest first.
    pub fn list(&self, limit: usize) -> Vec<&UploadRecord> {
        let mut records: Vec<_> = self
            .records
            .values()
            .filter(|r| r.modality.is_csv())
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        records
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        let uuid = Self::parse_id(id)?;
        if self.records.remove(&uuid).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        fs::remove_file(self.record_path(uuid))?;
        Ok(())
    }

    /// Read back a stored report, checking it against the report schema first.
    pub fn load_report(&self, id: &str) -> StoreResult<QaReport> {
        let record = self.get(id)?;
        validate_report_json(&record.qa_report).map_err(StoreError::InvalidReport)?;
        Ok(serde_json::from_value(record.qa_report.clone())?)
    }

    /// Write a record to disk and index it.
    pub fn insert(&mut self, record: UploadRecord) -> StoreResult<Uuid> {
        fs::create_dir_all(&self.dir)?;

        let content = serde_json::to_string_pretty(&record)?;
        fs::write(self.record_path(record.id), content)?;

        let id = record.id;
        self.records.insert(id, record);
        Ok(id)
    }
}

impl ReportSink for ReportStore {
    fn save(&mut self, report: &QaReport, modality: Modality) -> StoreResult<Uuid> {
        let record = UploadRecord::from_report(report, modality)?;
        self.insert(record)
    }
}

/// Sink over a store shared between threads.
///
/// The lock is taken only for the write, so analysis runs without it.
pub struct SharedStore<'a>(pub &'a Mutex<ReportStore>);

impl ReportSink for SharedStore<'_> {
    fn save(&mut self, report: &QaReport, modality: Modality) -> StoreResult<Uuid> {
        let mut store = self
            .0
            .lock()
            .map_err(|_| std::io::Error::other("report store lock poisoned"))?;
        store.save(report, modality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileMeta;
    use crate::report::analyze_content;
    use chrono::Duration;
    use tempfile::tempdir;

    fn report(content: &str) -> QaReport {
        analyze_content(content, &FileMeta::new("visits.csv", 42), None)
    }

    #[test]
    fn test_save_and_get() {
        let dir = tempdir().unwrap();
        let mut store = ReportStore::with_dir(dir.path());

        let id = store
            .save(&report("a,b\n1,2\n1,2\n"), Modality::Clinical)
            .unwrap();
        let record = store.get(&id.to_string()).unwrap();

        assert_eq!(record.file_name, "visits.csv");
        assert_eq!(record.file_size, 42);
        assert_eq!(record.qa_status, QaStatus::PassedWithWarnings);
        assert_eq!(record.qa_score, 75.0);
        assert!(dir.path().join(format!("{}.json", id)).exists());
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempdir().unwrap();
        let original = report("a\n1\n");
        let id = ReportStore::with_dir(dir.path())
            .save(&original, Modality::Wearable)
            .unwrap();

        let reopened = ReportStore::with_dir(dir.path());
        let loaded = reopened.load_report(&id.to_string()).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_list_newest_first_csv_only() {
        let dir = tempdir().unwrap();
        let mut store = ReportStore::with_dir(dir.path());
        let base = Utc::now();

        for (i, modality) in [Modality::Clinical, Modality::Mri, Modality::Neuropsychological]
            .into_iter()
            .enumerate()
        {
            let mut record = UploadRecord::from_report(&report("a\n1\n"), modality).unwrap();
            record.created_at = base + Duration::seconds(i as i64);
            store.insert(record).unwrap();
        }

        let listed: Vec<Modality> = store
            .list(DEFAULT_LIST_LIMIT)
            .iter()
            .map(|r| r.modality)
            .collect();
        assert_eq!(listed, vec![Modality::Neuropsychological, Modality::Clinical]);
        assert_eq!(store.list(1).len(), 1);
    }

    #[test]
    fn test_delete() {
        let dir = tempdir().unwrap();
        let mut store = ReportStore::with_dir(dir.path());
        let id = store.save(&report("a\n1\n"), Modality::Clinical).unwrap();

        store.delete(&id.to_string()).unwrap();
        assert!(store.get(&id.to_string()).is_err());
        assert!(!dir.path().join(format!("{}.json", id)).exists());
        assert!(matches!(
            store.delete(&id.to_string()),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_unknown_and_malformed_ids() {
        let store = ReportStore::with_dir(tempdir().unwrap().path());
        assert!(matches!(store.get("not-a-uuid"), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.get(&Uuid::new_v4().to_string()),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_tampered_report_is_rejected() {
        let dir = tempdir().unwrap();
        let mut store = ReportStore::with_dir(dir.path());
        let mut record = UploadRecord::from_report(&report("a\n1\n"), Modality::Clinical).unwrap();
        record.qa_report["totalRows"] = serde_json::json!("many");
        let id = store.insert(record).unwrap();

        assert!(matches!(
            store.load_report(&id.to_string()),
            Err(StoreError::InvalidReport(_))
        ));
    }

    #[test]
    fn test_shared_store_locks_only_to_save() {
        let dir = tempdir().unwrap();
        let shared = Mutex::new(ReportStore::with_dir(dir.path()));
        let mut sink = SharedStore(&shared);

        // the lock stays free between saves
        let id = sink.save(&report("a\n1\n"), Modality::Clinical).unwrap();
        assert!(shared.try_lock().is_ok());

        let second = sink.save(&report("a\n2\n"), Modality::Wearable).unwrap();
        let store = shared.lock().unwrap();
        assert!(store.get(&id.to_string()).is_ok());
        assert!(store.get(&second.to_string()).is_ok());
        assert_eq!(store.list(DEFAULT_LIST_LIMIT).len(), 2);
    }

    #[test]
    fn test_foreign_files_are_ignored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.json"), "{\"hello\": 1}").unwrap();
        fs::write(dir.path().join("readme.txt"), "x").unwrap();

        let store = ReportStore::with_dir(dir.path());
        assert!(store.list(DEFAULT_LIST_LIMIT).is_empty());
    }
}
