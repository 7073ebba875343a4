//! Command-line surface of the headless host.

use clap::{Parser, Subcommand};
use devtodo_core::{Category, CategoryKey};
use std::path::PathBuf;

/// Categorized to-do notes kept in `.vscode/tasks.json`.
#[derive(Parser, Debug)]
#[command(name = "devtodo", author, version, about, long_about = None)]
pub struct Cli {
    /// Workspace folder (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Task file path relative to the workspace
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files (logging is off without it)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the task tree (default)
    List,

    /// Add a task; missing values are prompted for
    Add {
        /// Task description
        text: Option<String>,

        /// Date or reminder note
        #[arg(short, long)]
        note: Option<String>,

        /// Category key or label, e.g. `featureIdeas` or "Discuss with Team"
        #[arg(short, long, value_parser = parse_category)]
        category: Option<Category>,
    },

    /// Check a task off, removing it
    Check {
        /// Category key the task is listed under
        category: String,

        /// Task id as shown by `list`
        id: String,
    },
}

impl Command {
    /// Category key of a `check` command.
    pub fn check_key(category: &str) -> CategoryKey {
        match Category::from_option_label(category) {
            Some(known) => CategoryKey::Known(known),
            None => CategoryKey::parse(category.trim()),
        }
    }
}

/// Accepts a category key (`completeLater`) or picker label (`Complete Later`).
pub fn parse_category(value: &str) -> Result<Category, String> {
    Category::from_key(value.trim())
        .or_else(|| Category::from_option_label(value))
        .ok_or_else(|| {
            let keys: Vec<_> = Category::ALL.iter().map(|c| c.key()).collect();
            format!("unknown category `{value}`; expected one of {}", keys.join(", "))
        })
}
