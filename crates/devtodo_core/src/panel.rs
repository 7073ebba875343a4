//! Side-panel controller and host capability contract.
//!
//! # Responsibility
//! - Define the UI capabilities the core needs from its host.
//! - Run the add-task command and checkbox toggle flows.
//! - Serve tree roots/children to the host renderer.
//!
//! # Invariants
//! - Each reaction performs at most one load/mutate/save cycle.
//! - Dismissed or blank prompts end the flow without writing.
//! - Store failures become host notices; nothing here panics.
//! - Change listeners fire once per successful save.

use crate::config::PanelConfig;
use crate::model::document::TaskDocument;
use crate::model::task::{Category, CategoryKey, TaskId};
use crate::projection::tree::{
    project_children, project_roots, CategoryNode, CheckState, TaskNode,
};
use crate::store::{StoreError, TaskStore};
use log::{debug, info, warn};

/// Host command id of the add-task action.
pub const ADD_TASK_COMMAND: &str = "dev-todo-list.addTask";
/// Notice shown when an action needs a workspace folder.
pub const NO_WORKSPACE_MESSAGE: &str = "Please open a folder or workspace to use this extension.";

const TASK_PROMPT: &str = "Enter a new task:";
const NOTE_PROMPT: &str = "Enter a date or reminder (optional):";
const NOTE_PLACEHOLDER: &str = "e.g. Friday, after release";
const CATEGORY_PLACEHOLDER: &str = "Select a category:";

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// UI capabilities provided by the hosting editor or a headless harness.
pub trait TaskHost {
    /// Shows a free-text input. `None` means the prompt was dismissed.
    fn prompt_text(&mut self, prompt: &str, placeholder: Option<&str>) -> Option<String>;
    /// Shows a single-choice category picker. `None` means dismissed.
    fn pick_category(&mut self, placeholder: &str, options: &[Category]) -> Option<Category>;
    /// Shows a user-visible message.
    fn notify(&mut self, level: NoticeLevel, message: &str);
}

/// Result of one add-task command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddTaskOutcome {
    Added { category: Category, id: TaskId },
    Cancelled,
    NoWorkspace,
    Failed,
}

/// Result of one checkbox state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Removed,
    /// Record was already gone; nothing written.
    NotFound,
    /// Transition back to unchecked; nothing to do.
    Ignored,
    NoWorkspace,
    Failed,
}

type ChangeListener = Box<dyn FnMut()>;

/// Controller between a host UI and one task store.
pub struct TaskPanel<H: TaskHost> {
    store: Option<TaskStore>,
    host: H,
    listeners: Vec<ChangeListener>,
}

impl<H: TaskHost> TaskPanel<H> {
    /// Creates a panel. `store = None` models a host with no open workspace.
    pub fn new(store: Option<TaskStore>, host: H) -> Self {
        Self {
            store,
            host,
            listeners: Vec::new(),
        }
    }

    /// Creates a panel from host configuration.
    pub fn from_config(config: &PanelConfig, host: H) -> Self {
        Self::new(config.task_store(), host)
    }

    pub fn store(&self) -> Option<&TaskStore> {
        self.store.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Registers a listener fired after every successful mutation.
    pub fn on_did_change(&mut self, listener: impl FnMut() + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Dispatches one host command id.
    ///
    /// Returns `None` for command ids this panel does not own.
    pub fn run_command(&mut self, command: &str) -> Option<AddTaskOutcome> {
        match command {
            ADD_TASK_COMMAND => Some(self.add_task()),
            other => {
                debug!("event=command_dispatch module=panel status=skipped command={other}");
                None
            }
        }
    }

    /// Root nodes for the tree view; empty without a workspace or on load failure.
    pub fn roots(&mut self) -> Vec<CategoryNode> {
        match self.load_for_view() {
            Some(document) => project_roots(&document),
            None => Vec::new(),
        }
    }

    /// Child nodes of one category; empty without a workspace or on load failure.
    pub fn children(&mut self, key: &CategoryKey) -> Vec<TaskNode> {
        match self.load_for_view() {
            Some(document) => project_children(&document, key),
            None => Vec::new(),
        }
    }

    /// Runs the add-task flow: text prompt, note prompt, category pick, save.
    pub fn add_task(&mut self) -> AddTaskOutcome {
        let Some(store) = self.store.clone() else {
            self.host.notify(NoticeLevel::Info, NO_WORKSPACE_MESSAGE);
            return AddTaskOutcome::NoWorkspace;
        };

        let text = match self.host.prompt_text(TASK_PROMPT, None) {
            Some(value) if !value.trim().is_empty() => value,
            _ => return self.cancelled("task_text"),
        };
        let Some(note) = self.host.prompt_text(NOTE_PROMPT, Some(NOTE_PLACEHOLDER)) else {
            return self.cancelled("note");
        };
        let Some(category) = self
            .host
            .pick_category(CATEGORY_PLACEHOLDER, &Category::ALL)
        else {
            return self.cancelled("category");
        };

        let mut document = match store.load() {
            Ok(document) => document,
            Err(err) => {
                self.report_store_error(&err);
                return AddTaskOutcome::Failed;
            }
        };
        let id = document.add_task(category, &text, Some(note.as_str()));
        if !self.persist(&store, &document) {
            return AddTaskOutcome::Failed;
        }

        info!(
            "event=task_add module=panel status=ok category={}",
            category.key()
        );
        self.host.notify(
            NoticeLevel::Info,
            &format!("Task added to {}!", category.option_label()),
        );
        AddTaskOutcome::Added { category, id }
    }

    /// Handles a checkbox change delivered by the host.
    ///
    /// Checking a task removes it from the store.
    pub fn on_check_state_changed(
        &mut self,
        key: &CategoryKey,
        id: &str,
        state: CheckState,
    ) -> ToggleOutcome {
        if state == CheckState::Unchecked {
            return ToggleOutcome::Ignored;
        }
        let Some(store) = self.store.clone() else {
            return ToggleOutcome::NoWorkspace;
        };

        let mut document = match store.load() {
            Ok(document) => document,
            Err(err) => {
                self.report_store_error(&err);
                return ToggleOutcome::Failed;
            }
        };
        if !document.remove_task(key, id) {
            warn!("event=task_check module=panel status=not_found category={key}");
            return ToggleOutcome::NotFound;
        }
        if !self.persist(&store, &document) {
            return ToggleOutcome::Failed;
        }

        info!("event=task_check module=panel status=ok category={key}");
        ToggleOutcome::Removed
    }

    fn load_for_view(&mut self) -> Option<TaskDocument> {
        let store = self.store.as_ref()?;
        match store.load() {
            Ok(document) => Some(document),
            Err(err) => {
                self.report_store_error(&err);
                None
            }
        }
    }

    fn persist(&mut self, store: &TaskStore, document: &TaskDocument) -> bool {
        match store.save(document) {
            Ok(()) => {
                self.fire_did_change();
                true
            }
            Err(err) => {
                self.report_store_error(&err);
                false
            }
        }
    }

    fn fire_did_change(&mut self) {
        for listener in self.listeners.iter_mut() {
            listener();
        }
    }

    fn cancelled(&self, step: &str) -> AddTaskOutcome {
        debug!("event=task_add module=panel status=cancelled step={step}");
        AddTaskOutcome::Cancelled
    }

    fn report_store_error(&mut self, err: &StoreError) {
        warn!(
            "event=store_failure module=panel status=error error_code={}",
            err.code()
        );
        let message = match err {
            StoreError::Read { .. } => format!("Could not read tasks: {err}"),
            StoreError::Deserialization { .. } => format!("Error reading tasks: {err}"),
            StoreError::Persistence { .. } => format!("Error saving tasks: {err}"),
        };
        self.host.notify(NoticeLevel::Error, &message);
    }
}
