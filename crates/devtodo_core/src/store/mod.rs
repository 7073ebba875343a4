//! Task file persistence.
//!
//! # Responsibility
//! - Read, self-heal and write the per-project JSON task file.
//! - Map file-system and decode failures to semantic store errors.
//!
//! # Invariants
//! - Every load re-reads the file; nothing is cached between calls.
//! - Loaded documents never contain records with blank task text.
//! - Saves overwrite the whole file; there is no rollback on failure.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub mod task_store;

pub use task_store::TaskStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from task file load/save operations.
#[derive(Debug)]
pub enum StoreError {
    /// Task file exists but could not be read.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Task file content is not a JSON object.
    Deserialization {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Directory creation or file write failed.
    Persistence {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StoreError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "tasks_read_failed",
            Self::Deserialization { .. } => "tasks_parse_failed",
            Self::Persistence { .. } => "tasks_write_failed",
        }
    }

    /// Task file path the failure relates to.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Deserialization { path, .. }
            | Self::Persistence { path, .. } => path.as_path(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read tasks file `{}`: {source}", path.display())
            }
            Self::Deserialization { path, source } => {
                write!(f, "tasks file `{}` is not valid: {source}", path.display())
            }
            Self::Persistence { path, source } => {
                write!(f, "failed to write tasks file `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Deserialization { source, .. } => Some(source),
            Self::Persistence { source, .. } => Some(source),
        }
    }
}
