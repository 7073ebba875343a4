//! Panel configuration supplied by the host.
//!
//! # Responsibility
//! - Carry the workspace root, task file location and logging settings.
//! - Validate values before the panel or logging is started.
//!
//! # Invariants
//! - `data_file` is resolved against `workspace_root`; an absolute
//!   `data_file` is used as is.
//! - No field is read from the environment.

use crate::logging::{default_log_level, normalize_level};
use crate::store::task_store::{DATA_DIR_NAME, DATA_FILE_NAME};
use crate::store::TaskStore;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Host-provided settings for one panel instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Open workspace folder. `None` means no folder is open.
    pub workspace_root: Option<PathBuf>,
    /// Task file path, relative to `workspace_root` unless absolute.
    pub data_file: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute log directory. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            workspace_root: None,
            data_file: default_data_file(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl PanelConfig {
    /// Default configuration for an open workspace folder.
    pub fn for_workspace(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: Some(workspace_root.into()),
            ..Self::default()
        }
    }

    /// Resolved task file path, or `None` without an open workspace.
    pub fn data_file_path(&self) -> Option<PathBuf> {
        self.workspace_root
            .as_deref()
            .map(|root| root.join(&self.data_file))
    }

    /// Store for the resolved task file, or `None` without an open workspace.
    pub fn task_store(&self) -> Option<TaskStore> {
        self.data_file_path().map(TaskStore::new)
    }

    /// Checks field values without touching the file system.
    ///
    /// # Errors
    /// - `ConfigError::EmptyDataFile` when `data_file` is empty.
    /// - `ConfigError::InvalidLogLevel` for an unsupported level.
    /// - `ConfigError::RelativeLogDir` when `log_dir` is not absolute.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_file.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataFile);
        }
        normalize_level(&self.log_level).map_err(ConfigError::InvalidLogLevel)?;
        if let Some(log_dir) = &self.log_dir {
            if !log_dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(log_dir.clone()));
            }
        }
        Ok(())
    }
}

/// Default task file location relative to the workspace root.
pub fn default_data_file() -> PathBuf {
    Path::new(DATA_DIR_NAME).join(DATA_FILE_NAME)
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDataFile,
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDataFile => write!(f, "data file path must not be empty"),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::RelativeLogDir(path) => {
                write!(f, "log dir must be an absolute path, got `{}`", path.display())
            }
        }
    }
}

impl Error for ConfigError {}
