//! JSON file task store.
//!
//! # Responsibility
//! - Load the task document from `<root>/.vscode/tasks.json`.
//! - Heal hand-edited or legacy content while loading.
//! - Persist documents as indented JSON.
//!
//! # Invariants
//! - A missing file loads as the canonical empty document.
//! - Records with missing/blank `task` are dropped from the fixed categories
//!   on every load.
//! - Legacy string entries and records without an id get an id derived from
//!   their key, position and text, so unchanged content keeps its ids.
//! - Unknown groups are carried as read and are not healed.
//! - Task text is never written to logs.

use crate::model::document::TaskDocument;
use crate::model::task::{derived_task_id, CategoryKey, TaskRecord, NO_DATE};
use crate::store::{StoreError, StoreResult};
use log::{debug, error, info};
use serde::Deserialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Directory under the workspace root that holds the task file.
pub const DATA_DIR_NAME: &str = ".vscode";
/// Task file name inside [`DATA_DIR_NAME`].
pub const DATA_FILE_NAME: &str = "tasks.json";

/// Durable CRUD access to one task file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Creates a store backed by an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store backed by `<workspace_root>/.vscode/tasks.json`.
    pub fn for_workspace(workspace_root: impl AsRef<Path>) -> Self {
        Self::new(
            workspace_root
                .as_ref()
                .join(DATA_DIR_NAME)
                .join(DATA_FILE_NAME),
        )
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the task file, or returns an empty document when it is absent.
    ///
    /// # Errors
    /// - `StoreError::Read` when the file exists but cannot be read.
    /// - `StoreError::Deserialization` when the content is not a JSON object.
    pub fn load(&self) -> StoreResult<TaskDocument> {
        let started_at = Instant::now();

        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(
                    "event=tasks_load module=store status=ok source=default duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(TaskDocument::new());
            }
            Err(err) => {
                error!(
                    "event=tasks_load module=store status=error error_code=tasks_read_failed error={}",
                    err
                );
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        let (mut document, report) = match parse_document(&text) {
            Ok(parsed) => parsed,
            Err(err) => {
                error!(
                    "event=tasks_load module=store status=error error_code=tasks_parse_failed line={} column={}",
                    err.line(),
                    err.column()
                );
                return Err(StoreError::Deserialization {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };
        let dropped_blank = document.drop_blank_records();

        info!(
            "event=tasks_load module=store status=ok source=file records={} dropped_blank={} dropped_malformed={} legacy={} assigned_ids={} duration_ms={}",
            document.len(),
            dropped_blank,
            report.malformed,
            report.legacy,
            report.assigned_ids,
            started_at.elapsed().as_millis()
        );
        Ok(document)
    }

    /// Writes `document` as indented JSON, creating the parent directory.
    ///
    /// # Errors
    /// - `StoreError::Persistence` when the directory or file cannot be
    ///   written. The caller's document is left as is.
    pub fn save(&self, document: &TaskDocument) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.write_document(document) {
            Ok(()) => {
                info!(
                    "event=tasks_save module=store status=ok records={} duration_ms={}",
                    document.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=tasks_save module=store status=error error_code=tasks_write_failed duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(StoreError::Persistence {
                    path: self.path.clone(),
                    source: err,
                })
            }
        }
    }

    fn write_document(&self, document: &TaskDocument) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(document).map_err(std::io::Error::from)?;
        std::fs::write(&self.path, json)
    }
}

/// Counters collected while decoding one file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct DecodeReport {
    legacy: usize,
    malformed: usize,
    assigned_ids: usize,
}

/// One array entry as found on disk.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    /// First file revision stored bare task strings.
    Legacy(String),
    Record(StoredRecord),
}

#[derive(Debug, Deserialize)]
struct StoredRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    task: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    completed: Option<bool>,
}

fn parse_document(text: &str) -> Result<(TaskDocument, DecodeReport), serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(groups) = value else {
        return Err(serde::de::Error::custom(
            "expected a JSON object at the top level",
        ));
    };

    let mut document = TaskDocument::new();
    let mut report = DecodeReport::default();
    for (key, entries) in groups {
        let records: Vec<(usize, TaskRecord)> = match &entries {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .filter_map(|(position, item)| {
                    decode_entry(&key, position, item, &mut report)
                        .map(|record| (position, record))
                })
                .collect(),
            _ => {
                report.malformed += 1;
                Vec::new()
            }
        };
        match CategoryKey::parse(&key) {
            CategoryKey::Known(category) => document.set_group(
                category.into(),
                records.into_iter().map(|(_, record)| record).collect(),
            ),
            // Unknown groups keep their file content; only readable tasks are shown.
            CategoryKey::Other(name) => {
                let visible = records
                    .into_iter()
                    .filter(|(_, record)| record.has_task_text())
                    .collect();
                document.set_other_group(name, entries, visible);
            }
        }
    }
    Ok((document, report))
}

fn decode_entry(
    key: &str,
    position: usize,
    item: &Value,
    report: &mut DecodeReport,
) -> Option<TaskRecord> {
    match StoredEntry::deserialize(item) {
        Ok(StoredEntry::Legacy(text)) => {
            report.legacy += 1;
            Some(TaskRecord::with_id(
                derived_task_id(key, position, &text),
                &text,
                None,
            ))
        }
        Ok(StoredEntry::Record(stored)) => {
            let task = stored.task.unwrap_or_default();
            let id = match stored.id {
                Some(id) if !id.trim().is_empty() => id,
                _ => {
                    report.assigned_ids += 1;
                    derived_task_id(key, position, &task)
                }
            };
            Some(TaskRecord {
                id,
                task,
                date: stored.date.unwrap_or_else(|| NO_DATE.to_string()),
                completed: stored.completed.unwrap_or(false),
            })
        }
        Err(_) => {
            report.malformed += 1;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_document, TaskStore};
    use crate::model::task::{Category, CategoryKey, NO_DATE};
    use std::path::Path;

    #[test]
    fn for_workspace_points_at_vscode_tasks_file() {
        let store = TaskStore::for_workspace("/work/project");
        assert_eq!(store.path(), Path::new("/work/project/.vscode/tasks.json"));
    }

    #[test]
    fn parse_accepts_legacy_string_entries() {
        let (doc, report) =
            parse_document(r#"{"featureIdeas": ["dark mode"], "miscellaneous": []}"#)
                .expect("legacy content should parse");
        let records = doc.tasks(Category::FeatureIdeas);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].task, "dark mode");
        assert_eq!(records[0].date, NO_DATE);
        assert!(!records[0].id.is_empty());
        assert_eq!(report.legacy, 1);
    }

    #[test]
    fn parse_assigns_ids_and_drops_malformed_entries() {
        let (doc, report) = parse_document(
            r#"{"completeLater": [{"task": "no id"}, 42, {"task": 7}], "someday": "oops"}"#,
        )
        .expect("object content should parse");
        let records = doc.tasks(Category::CompleteLater);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].task, "no id");
        assert_eq!(report.assigned_ids, 1);
        assert_eq!(report.malformed, 3);
        assert!(doc
            .tasks_for(&CategoryKey::Other("someday".to_string()))
            .is_empty());
    }

    #[test]
    fn derived_ids_are_stable_across_parses() {
        let text = r#"{"featureIdeas": ["dark mode"], "completeLater": [{"task": "no id"}]}"#;
        let (first, _) = parse_document(text).expect("first parse");
        let (second, _) = parse_document(text).expect("second parse");
        assert_eq!(first, second);
        assert_ne!(
            first.tasks(Category::FeatureIdeas)[0].id,
            first.tasks(Category::CompleteLater)[0].id
        );
    }

    #[test]
    fn parse_rejects_non_object_top_level() {
        let err = parse_document("[1, 2]").expect_err("arrays are not documents");
        assert!(err.to_string().contains("JSON object"));
    }
}
