//! Popup state for questions the model asks during auto-generation.

use crate::dialogue::{DialogueOutcome, UserAnswer};
use crate::tui::input::InputField;

#[derive(Debug, Clone)]
pub enum PromptInput {
    Text(InputField),
    /// `true` while "yes" is highlighted.
    Confirm(bool),
    Choice { options: Vec<String>, selected: usize },
}

/// A question on screen, waiting for the user.
#[derive(Debug, Clone)]
pub struct DialoguePrompt {
    pub question: String,
    pub input: PromptInput,
}

impl DialoguePrompt {
    /// Popup for an outcome that asks the user something.
    pub fn from_outcome(outcome: &DialogueOutcome) -> Option<Self> {
        let (question, input) = match outcome {
            DialogueOutcome::NeedsText { prompt } => {
                let mut field = InputField::new();
                field.active = true;
                (prompt, PromptInput::Text(field))
            }
            DialogueOutcome::NeedsConfirmation { prompt } => (prompt, PromptInput::Confirm(true)),
            DialogueOutcome::NeedsChoice { prompt, options } => (
                prompt,
                PromptInput::Choice { options: options.clone(), selected: 0 },
            ),
            _ => return None,
        };
        Some(Self { question: question.clone(), input })
    }

    /// Text prompt with no model behind it, used to ask for the topic.
    pub fn topic(question: &str) -> Self {
        let mut field = InputField::new();
        field.active = true;
        Self { question: question.to_string(), input: PromptInput::Text(field) }
    }

    pub fn handle_char(&mut self, c: char) {
        match &mut self.input {
            PromptInput::Text(field) => field.handle_char(c),
            PromptInput::Confirm(yes) => match c {
                'y' | 'Y' => *yes = true,
                'n' | 'N' => *yes = false,
                _ => {}
            },
            PromptInput::Choice { options, selected } => {
                if let Some(n) = c.to_digit(10) {
                    let n = n as usize;
                    if n >= 1 && n <= options.len() {
                        *selected = n - 1;
                    }
                }
            }
        }
    }

    pub fn handle_backspace(&mut self) {
        if let PromptInput::Text(field) = &mut self.input {
            field.handle_backspace();
        }
    }

    /// Arrow keys: cursor for text, toggle for yes/no, highlight for options.
    pub fn handle_arrow(&mut self, forward: bool) {
        match &mut self.input {
            PromptInput::Text(field) => {
                if forward {
                    field.move_cursor_right();
                } else {
                    field.move_cursor_left();
                }
            }
            PromptInput::Confirm(yes) => *yes = !*yes,
            PromptInput::Choice { options, selected } => {
                let count = options.len().max(1);
                *selected = if forward { (*selected + 1) % count } else { (*selected + count - 1) % count };
            }
        }
    }

    /// The answer as it stands; `None` for empty text.
    pub fn answer(&self) -> Option<UserAnswer> {
        match &self.input {
            PromptInput::Text(field) => {
                let text = field.value.trim();
                (!text.is_empty()).then(|| UserAnswer::Text(text.to_string()))
            }
            PromptInput::Confirm(yes) => Some(UserAnswer::Confirm(*yes)),
            PromptInput::Choice { selected, .. } => Some(UserAnswer::Choice(*selected)),
        }
    }
}
