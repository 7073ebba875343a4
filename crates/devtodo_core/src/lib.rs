//! Core domain logic for the devtodo side panel.
//! This crate owns the task file format and every task-list invariant.

pub mod config;
pub mod logging;
pub mod model;
pub mod panel;
pub mod projection;
pub mod store;

pub use config::{ConfigError, PanelConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::TaskDocument;
pub use model::task::{Category, CategoryKey, TaskId, TaskRecord, NO_DATE};
pub use panel::{
    AddTaskOutcome, NoticeLevel, TaskHost, TaskPanel, ToggleOutcome, ADD_TASK_COMMAND,
    NO_WORKSPACE_MESSAGE,
};
pub use projection::tree::{
    project_children, project_roots, CategoryNode, CheckState, NodeIcon, TaskNode, UNNAMED_TASK,
};
pub use store::{StoreError, StoreResult, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
