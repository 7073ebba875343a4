//! Line-oriented terminal host.
//!
//! # Responsibility
//! - Answer panel prompts from preset flag values or from input lines.
//! - Render the task tree and notices as plain text.
//!
//! # Invariants
//! - End of input or a blank answer to a required prompt dismisses it.
//! - Preset answers are consumed once.
//! - The first failed write is kept until the caller takes it.

use devtodo_core::{Category, CategoryNode, CheckState, NoticeLevel, TaskHost, TaskNode};
use std::io::{self, BufRead, Write};

/// Answers supplied on the command line instead of interactively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetAnswers {
    pub text: Option<String>,
    pub note: Option<String>,
    pub category: Option<Category>,
}

/// `TaskHost` backed by a line reader and a writer.
pub struct ConsoleHost<R, W> {
    input: R,
    output: W,
    preset: PresetAnswers,
    text_prompts_seen: usize,
    write_error: Option<io::Error>,
}

impl<R: BufRead, W: Write> ConsoleHost<R, W> {
    pub fn new(input: R, output: W, preset: PresetAnswers) -> Self {
        Self {
            input,
            output,
            preset,
            text_prompts_seen: 0,
            write_error: None,
        }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Returns the first write failure seen while prompting or notifying.
    pub fn take_write_error(&mut self) -> Option<io::Error> {
        self.write_error.take()
    }

    /// Prints one category node followed by its children.
    pub fn render_group(&mut self, root: &CategoryNode, children: &[TaskNode]) -> io::Result<()> {
        writeln!(self.output, "{}", root.label)?;
        if children.is_empty() {
            writeln!(self.output, "    (empty)")?;
        }
        for child in children {
            let mark = match child.state {
                CheckState::Unchecked => ' ',
                CheckState::Checked => 'x',
            };
            writeln!(
                self.output,
                "    [{mark}] {}  #{}",
                child.label, child.task_id
            )?;
        }
        Ok(())
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            if self.write_error.is_none() {
                self.write_error = Some(err);
            }
        }
    }

    fn read_answer(&mut self, prompt: &str) -> Option<String> {
        let written = write!(self.output, "{prompt} ").and_then(|()| self.output.flush());
        self.record(written);
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl<R: BufRead, W: Write> TaskHost for ConsoleHost<R, W> {
    fn prompt_text(&mut self, prompt: &str, placeholder: Option<&str>) -> Option<String> {
        self.text_prompts_seen += 1;
        // First text prompt is the task, second the note.
        let preset = match self.text_prompts_seen {
            1 => self.preset.text.take(),
            2 => self.preset.note.take(),
            _ => None,
        };
        if preset.is_some() {
            return preset;
        }
        match placeholder {
            Some(hint) => self.read_answer(&format!("{prompt} [{hint}]")),
            None => self.read_answer(prompt),
        }
    }

    fn pick_category(&mut self, placeholder: &str, options: &[Category]) -> Option<Category> {
        if let Some(category) = self.preset.category.take() {
            return Some(category);
        }
        for (index, option) in options.iter().enumerate() {
            let written = writeln!(self.output, "  {}) {}", index + 1, option.option_label());
            self.record(written);
        }
        let answer = self.read_answer(placeholder)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return None;
        }
        let picked = match answer.parse::<usize>() {
            Ok(number) => number.checked_sub(1).and_then(|index| options.get(index).copied()),
            Err(_) => Category::from_option_label(answer)
                .or_else(|| Category::from_key(answer))
                .filter(|category| options.contains(category)),
        };
        if picked.is_none() {
            let written = writeln!(self.output, "Unknown category `{answer}`.");
            self.record(written);
        }
        picked
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        let written = match level {
            NoticeLevel::Info => writeln!(self.output, "{message}"),
            NoticeLevel::Error => writeln!(self.output, "error: {message}"),
        };
        self.record(written);
    }
}
