//! Task record and category model.
//!
//! # Responsibility
//! - Define the canonical record persisted in the task file.
//! - Define the closed category set and its presentation constants.
//!
//! # Invariants
//! - `id` is generated once at creation and never reused.
//! - File entries without an id get a derived id that is stable across
//!   loads of unchanged content.
//! - `date` is never empty on records built here; absent notes become
//!   [`NO_DATE`].
//! - The category set is fixed at four; unknown keys from hand-edited files
//!   are carried as [`CategoryKey::Other`].

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one task record.
///
/// Kept as a string because hand-edited files may carry arbitrary ids.
pub type TaskId = String;

/// Placeholder stored when the user gives no date/reminder note.
pub const NO_DATE: &str = "No date";

/// Fixed task category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    FeatureIdeas,
    CompleteLater,
    DiscussWithTeam,
    Miscellaneous,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 4] = [
        Category::FeatureIdeas,
        Category::CompleteLater,
        Category::DiscussWithTeam,
        Category::Miscellaneous,
    ];

    /// JSON key used in the task file.
    pub fn key(self) -> &'static str {
        match self {
            Self::FeatureIdeas => "featureIdeas",
            Self::CompleteLater => "completeLater",
            Self::DiscussWithTeam => "discussWithTeam",
            Self::Miscellaneous => "miscellaneous",
        }
    }

    /// Numbered label shown on the category node.
    pub fn label(self) -> &'static str {
        match self {
            Self::FeatureIdeas => "1. Feature Idea to Implement",
            Self::CompleteLater => "2. Left this to complete later",
            Self::DiscussWithTeam => "3. Discuss this with team",
            Self::Miscellaneous => "4. Miscellaneous",
        }
    }

    /// Short label offered in the category picker.
    pub fn option_label(self) -> &'static str {
        match self {
            Self::FeatureIdeas => "Feature Idea",
            Self::CompleteLater => "Complete Later",
            Self::DiscussWithTeam => "Discuss with Team",
            Self::Miscellaneous => "Miscellaneous",
        }
    }

    /// Parses one JSON key. Matching is exact.
    pub fn from_key(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == value)
    }

    /// Parses one picker label, ignoring ASCII case and surrounding blanks.
    pub fn from_option_label(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.option_label().eq_ignore_ascii_case(trimmed))
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::FeatureIdeas => 0,
            Self::CompleteLater => 1,
            Self::DiscussWithTeam => 2,
            Self::Miscellaneous => 3,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Key of one category group found in a document.
///
/// `Other` holds keys that are not part of the fixed set, usually from a
/// hand-edited file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryKey {
    Known(Category),
    Other(String),
}

impl CategoryKey {
    /// Classifies a raw JSON key.
    pub fn parse(raw: &str) -> Self {
        match Category::from_key(raw) {
            Some(category) => Self::Known(category),
            None => Self::Other(raw.to_string()),
        }
    }

    /// Raw key text as stored in the file.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(category) => category.key(),
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl From<Category> for CategoryKey {
    fn from(value: Category) -> Self {
        Self::Known(value)
    }
}

impl Display for CategoryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One to-do note as persisted in the task file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    /// Trimmed description. Never blank once a document has been loaded.
    pub task: String,
    /// Free-form date or reminder text, or [`NO_DATE`].
    pub date: String,
    /// Written `false` by the add path; checked tasks are removed instead.
    pub completed: bool,
}

impl TaskRecord {
    /// Creates a record with a freshly generated id.
    ///
    /// `text` is trimmed but not validated; callers reject blank input first.
    /// A missing or blank `note` becomes [`NO_DATE`].
    pub fn new(text: &str, note: Option<&str>) -> Self {
        Self::with_id(new_task_id(), text, note)
    }

    /// Creates a record with a caller-provided id.
    pub fn with_id(id: impl Into<TaskId>, text: &str, note: Option<&str>) -> Self {
        Self {
            id: id.into(),
            task: text.trim().to_string(),
            date: normalize_note(note),
            completed: false,
        }
    }

    /// Returns whether the description carries any non-blank text.
    pub fn has_task_text(&self) -> bool {
        !self.task.trim().is_empty()
    }
}

/// Generates a new random task id.
pub fn new_task_id() -> TaskId {
    Uuid::new_v4().to_string()
}

const FILE_ENTRY_NAMESPACE: Uuid = Uuid::from_u128(0x5f0c_93d2_7a41_4e8b_b1c6_2d94_e07a_3f18);

/// Id for a file entry that carries none of its own.
///
/// Derived from the group key, array position and text, so the same file
/// content yields the same id on every load until the entry is rewritten.
pub(crate) fn derived_task_id(key: &str, position: usize, text: &str) -> TaskId {
    let name = format!("{key}\u{0}{position}\u{0}{text}");
    Uuid::new_v5(&FILE_ENTRY_NAMESPACE, name.as_bytes()).to_string()
}

fn normalize_note(note: Option<&str>) -> String {
    match note.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => NO_DATE.to_string(),
    }
}
