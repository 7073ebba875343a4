//! In-memory task document.
//!
//! # Responsibility
//! - Hold the per-category record sequences of one task file.
//! - Provide the pure add/remove mutations used by the panel.
//!
//! # Invariants
//! - The four fixed categories are always present (fixed-size storage).
//! - Unknown groups keep the order in which they were inserted.
//! - Unknown groups are written back exactly as read, minus removed tasks.
//! - Removal preserves the relative order of remaining records.

use crate::model::task::{Category, CategoryKey, TaskId, TaskRecord};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{json, Value};

/// Mapping from category key to ordered task records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDocument {
    known: [Vec<TaskRecord>; 4],
    others: Vec<OtherGroup>,
}

/// Group stored under a key outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OtherGroup {
    name: String,
    /// Group value as found in the file.
    raw: Value,
    /// Task records decoded from `raw`.
    records: Vec<TaskRecord>,
    /// Array index in `raw` of each entry in `records`.
    slots: Vec<usize>,
}

impl OtherGroup {
    fn remove(&mut self, id: &str) -> bool {
        let Some(index) = self.records.iter().position(|record| record.id == id) else {
            return false;
        };
        self.records.remove(index);
        let slot = self.slots.remove(index);
        if let Value::Array(items) = &mut self.raw {
            if slot < items.len() {
                items.remove(slot);
            }
        }
        for other in self.slots.iter_mut() {
            if *other > slot {
                *other -= 1;
            }
        }
        true
    }
}

impl TaskDocument {
    /// Creates the canonical empty document: four empty categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records of one fixed category.
    pub fn tasks(&self, category: Category) -> &[TaskRecord] {
        &self.known[category.index()]
    }

    /// Records under any key; unknown keys that are absent yield an empty slice.
    pub fn tasks_for(&self, key: &CategoryKey) -> &[TaskRecord] {
        match key {
            CategoryKey::Known(category) => self.tasks(*category),
            CategoryKey::Other(raw) => self
                .other(raw)
                .map(|group| group.records.as_slice())
                .unwrap_or(&[]),
        }
    }

    /// Unknown group keys in insertion order.
    pub fn other_keys(&self) -> impl Iterator<Item = &str> {
        self.others.iter().map(|group| group.name.as_str())
    }

    /// Every group key: the fixed four first, then unknown keys.
    pub fn keys(&self) -> impl Iterator<Item = CategoryKey> + '_ {
        Category::ALL
            .into_iter()
            .map(CategoryKey::Known)
            .chain(self.other_keys().map(|raw| CategoryKey::Other(raw.to_string())))
    }

    /// Replaces the group stored under `key` with `records`.
    ///
    /// The key is classified by its text, so `Other("featureIdeas")` lands in
    /// the fixed category. An unknown key that is not present yet is appended
    /// after existing unknown groups.
    pub fn set_group(&mut self, key: CategoryKey, records: Vec<TaskRecord>) {
        match CategoryKey::parse(key.as_str()) {
            CategoryKey::Known(category) => self.known[category.index()] = records,
            CategoryKey::Other(name) => {
                let raw = Value::Array(records.iter().map(record_value).collect());
                let slots = (0..records.len()).collect();
                self.put_other(OtherGroup {
                    name,
                    raw,
                    records,
                    slots,
                });
            }
        }
    }

    /// Stores an unknown group read from a file.
    ///
    /// `records` pairs each decoded task with its index in `raw`. `raw` is
    /// written back unchanged apart from later removals.
    pub(crate) fn set_other_group(
        &mut self,
        name: String,
        raw: Value,
        records: Vec<(usize, TaskRecord)>,
    ) {
        let (slots, records) = records.into_iter().unzip();
        self.put_other(OtherGroup {
            name,
            raw,
            records,
            slots,
        });
    }

    /// Appends a new record to `category` and returns its generated id.
    ///
    /// # Contract
    /// - `text` is trimmed but not validated; callers reject blank input.
    /// - A missing or blank `note` is stored as `"No date"`.
    /// - `completed` starts as `false`.
    pub fn add_task(&mut self, category: Category, text: &str, note: Option<&str>) -> TaskId {
        let record = TaskRecord::new(text, note);
        let id = record.id.clone();
        self.known[category.index()].push(record);
        id
    }

    /// Removes the first record with `id` under `key`.
    ///
    /// Returns `false` (and leaves the document untouched) when no record
    /// matches.
    pub fn remove_task(&mut self, key: &CategoryKey, id: &str) -> bool {
        match key {
            CategoryKey::Known(category) => {
                let records = &mut self.known[category.index()];
                match records.iter().position(|record| record.id == id) {
                    Some(index) => {
                        records.remove(index);
                        true
                    }
                    None => false,
                }
            }
            CategoryKey::Other(raw) => self
                .others
                .iter_mut()
                .find(|group| group.name == *raw)
                .is_some_and(|group| group.remove(id)),
        }
    }

    /// Total number of records across all groups.
    pub fn len(&self) -> usize {
        self.known.iter().map(Vec::len).sum::<usize>()
            + self
                .others
                .iter()
                .map(|group| group.records.len())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops records with blank task text from the fixed categories.
    ///
    /// Returns the number of dropped records.
    pub(crate) fn drop_blank_records(&mut self) -> usize {
        let mut dropped = 0;
        for records in self.known.iter_mut() {
            let before = records.len();
            records.retain(TaskRecord::has_task_text);
            dropped += before - records.len();
        }
        dropped
    }

    fn other(&self, name: &str) -> Option<&OtherGroup> {
        self.others.iter().find(|group| group.name == name)
    }

    fn put_other(&mut self, group: OtherGroup) {
        match self.others.iter_mut().find(|existing| existing.name == group.name) {
            Some(existing) => *existing = group,
            None => self.others.push(group),
        }
    }
}

fn record_value(record: &TaskRecord) -> Value {
    json!({
        "id": record.id,
        "task": record.task,
        "date": record.date,
        "completed": record.completed,
    })
}

/// Serializes as a JSON object: fixed keys in display order, then unknown keys.
impl Serialize for TaskDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.known.len() + self.others.len()))?;
        for category in Category::ALL {
            map.serialize_entry(category.key(), self.tasks(category))?;
        }
        for group in &self.others {
            map.serialize_entry(&group.name, &group.raw)?;
        }
        map.end()
    }
}
