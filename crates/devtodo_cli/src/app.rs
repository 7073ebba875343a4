//! Command execution for the headless host.

use crate::cli::{Cli, Command};
use crate::host::{ConsoleHost, PresetAnswers};
use anyhow::{Context, Result};
use devtodo_core::{
    core_version, init_logging, AddTaskOutcome, CheckState, NoticeLevel, PanelConfig, TaskHost,
    TaskPanel, ToggleOutcome, ADD_TASK_COMMAND,
};
use log::info;
use std::cell::Cell;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::rc::Rc;

/// Builds panel configuration from flags, defaulting the workspace to `cwd`.
pub fn build_config(cli: &Cli, cwd: &Path) -> Result<PanelConfig> {
    let workspace = cli
        .workspace
        .clone()
        .unwrap_or_else(|| cwd.to_path_buf());
    let mut config = PanelConfig::for_workspace(workspace);
    if let Some(data_file) = &cli.data_file {
        config.data_file = data_file.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.log_dir = cli.log_dir.clone();
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Runs one command. Returns `false` when the command did not succeed.
pub fn run<R: BufRead, W: Write>(cli: Cli, cwd: &Path, input: R, output: W) -> Result<bool> {
    let config = build_config(&cli, cwd)?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)
            .map_err(anyhow::Error::msg)
            .context("failed to start logging")?;
    }

    let command = cli.command.unwrap_or(Command::List);
    let preset = match &command {
        Command::Add {
            text,
            note,
            category,
        } => PresetAnswers {
            text: text.clone(),
            // A task given as an argument never waits for a note.
            note: match (text, note) {
                (Some(_), None) => Some(String::new()),
                _ => note.clone(),
            },
            category: *category,
        },
        _ => PresetAnswers::default(),
    };

    let mut panel = TaskPanel::from_config(&config, ConsoleHost::new(input, output, preset));
    let changed = Rc::new(Cell::new(false));
    let observed = Rc::clone(&changed);
    panel.on_did_change(move || observed.set(true));

    info!(
        "event=cli_command module=cli status=start command={} core_version={}",
        command_name(&command),
        core_version()
    );
    let succeeded = match command {
        Command::List => {
            render_tree(&mut panel).context("failed to write task list")?;
            true
        }
        Command::Add { .. } => matches!(
            panel.run_command(ADD_TASK_COMMAND),
            Some(AddTaskOutcome::Added { .. } | AddTaskOutcome::Cancelled)
        ),
        Command::Check { category, id } => {
            let key = Command::check_key(&category);
            match panel.on_check_state_changed(&key, id.trim(), CheckState::Checked) {
                ToggleOutcome::Removed => true,
                ToggleOutcome::NotFound => {
                    panel.host_mut().notify(
                        NoticeLevel::Error,
                        &format!("No task `{}` under `{key}`.", id.trim()),
                    );
                    false
                }
                ToggleOutcome::Ignored => true,
                ToggleOutcome::NoWorkspace | ToggleOutcome::Failed => false,
            }
        }
    };

    if changed.get() {
        render_tree(&mut panel).context("failed to write task list")?;
    }
    if let Some(err) = panel.host_mut().take_write_error() {
        return Err(err).context("failed to write output");
    }
    Ok(succeeded)
}

fn render_tree<R: BufRead, W: Write>(
    panel: &mut TaskPanel<ConsoleHost<R, W>>,
) -> io::Result<()> {
    for root in panel.roots() {
        let children = panel.children(&root.key);
        panel.host_mut().render_group(&root, &children)?;
    }
    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::List => "list",
        Command::Add { .. } => "add",
        Command::Check { .. } => "check",
    }
}
