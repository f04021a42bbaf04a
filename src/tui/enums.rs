//! Enumerations for TUI state management.

use crate::lang::PackInfo;
use crate::tui::prompt::DialoguePrompt;
use crate::tui::task_form::TaskForm;

/// What the board screen is showing on top of the columns.
#[derive(Debug, Clone)]
pub enum Mode {
    Board,
    Detail,
    Help,
    AddTask(TaskForm),
    /// Asking for the topic of a new auto-generated task.
    Topic(DialoguePrompt),
    /// A question from the running generation session.
    Prompt(DialoguePrompt),
    ConfirmDelete(u64),
    LanguagePicker { packs: Vec<PackInfo>, selected: usize },
}

impl Mode {
    /// Whether a modal interaction is open.
    pub fn is_modal(&self) -> bool {
        !matches!(self, Mode::Board)
    }
}

/// Message box shown over everything else until a key is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub is_error: bool,
}

/// Return value of the board app to indicate what should happen next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardExit {
    Quit,
    /// Language changed: rebuild the UI with the new pack.
    Reload,
}
