//! Two-level tree projection: category nodes over task nodes.
//!
//! # Invariants
//! - Roots always start with the four fixed categories in display order.
//! - Unknown groups follow, labelled with their raw key.
//! - Children keep record order and start unchecked.

use crate::model::document::TaskDocument;
use crate::model::task::{CategoryKey, TaskId, TaskRecord, NO_DATE};

/// Fallback label for a record whose task text is blank.
pub const UNNAMED_TASK: &str = "Unnamed Task";

/// Icon hint passed to the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeIcon {
    Folder,
    Checklist,
}

impl NodeIcon {
    /// Host icon id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Checklist => "checklist",
        }
    }
}

/// Interactive checkbox state of one task node.
///
/// `Checked` is terminal: the panel removes the record once it is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    #[default]
    Unchecked,
    Checked,
}

/// Root-level node for one category group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    pub key: CategoryKey,
    pub label: String,
    pub icon: NodeIcon,
    /// Category nodes render expanded.
    pub expanded: bool,
}

/// Leaf node for one task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNode {
    pub label: String,
    pub category: CategoryKey,
    pub task_id: TaskId,
    pub icon: NodeIcon,
    pub state: CheckState,
}

/// Projects category nodes for every group in `document`.
pub fn project_roots(document: &TaskDocument) -> Vec<CategoryNode> {
    document
        .keys()
        .map(|key| {
            let label = match &key {
                CategoryKey::Known(category) => category.label().to_string(),
                CategoryKey::Other(raw) => raw.clone(),
            };
            CategoryNode {
                key,
                label,
                icon: NodeIcon::Folder,
                expanded: true,
            }
        })
        .collect()
}

/// Projects task nodes for the records stored under `key`.
pub fn project_children(document: &TaskDocument, key: &CategoryKey) -> Vec<TaskNode> {
    document
        .tasks_for(key)
        .iter()
        .map(|record| TaskNode {
            label: task_label(record),
            category: key.clone(),
            task_id: record.id.clone(),
            icon: NodeIcon::Checklist,
            state: CheckState::Unchecked,
        })
        .collect()
}

/// Composes `"<task> (<date>)"` with placeholders for blank fields.
pub fn task_label(record: &TaskRecord) -> String {
    let task = non_blank_or(&record.task, UNNAMED_TASK);
    let date = non_blank_or(&record.date, NO_DATE);
    format!("{task} ({date})")
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}
