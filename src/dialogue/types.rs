//! Dialogue outcome, answer and state types.

/// What one round trip with the model produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueOutcome {
    Completed {
        title: String,
        description: String,
        reward: String,
    },
    NeedsText {
        prompt: String,
    },
    NeedsChoice {
        prompt: String,
        options: Vec<String>,
    },
    NeedsConfirmation {
        prompt: String,
    },
    Aborted {
        message: String,
    },
    Failed {
        error: String,
    },
}

impl DialogueOutcome {
    /// Whether the session is over once this outcome is delivered.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DialogueOutcome::Completed { .. } | DialogueOutcome::Aborted { .. } | DialogueOutcome::Failed { .. }
        )
    }

    /// The kind of answer this outcome asks for, if any.
    pub fn prompt_kind(&self) -> Option<PromptKind> {
        match self {
            DialogueOutcome::NeedsText { .. } => Some(PromptKind::Text),
            DialogueOutcome::NeedsChoice { options, .. } => Some(PromptKind::Choice(options.len())),
            DialogueOutcome::NeedsConfirmation { .. } => Some(PromptKind::Confirmation),
            _ => None,
        }
    }
}

/// Kind of input the model is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Text,
    Confirmation,
    /// Choice among this many options.
    Choice(usize),
}

/// The user's reply to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAnswer {
    Text(String),
    Confirm(bool),
    /// Zero-based index into the offered options.
    Choice(usize),
}

impl UserAnswer {
    /// Text recorded in the conversation history.
    pub fn render(&self) -> String {
        match self {
            UserAnswer::Text(text) => text.clone(),
            UserAnswer::Confirm(true) => "Yes".to_string(),
            UserAnswer::Confirm(false) => "No".to_string(),
            UserAnswer::Choice(index) => format!("№{}", index + 1),
        }
    }

    /// Whether this answer fits the prompt that was asked.
    pub fn fits(&self, kind: PromptKind) -> bool {
        match (self, kind) {
            (UserAnswer::Text(_), PromptKind::Text) => true,
            (UserAnswer::Confirm(_), PromptKind::Confirmation) => true,
            (UserAnswer::Choice(index), PromptKind::Choice(count)) => *index < count,
            _ => false,
        }
    }
}

/// Where the engine is in the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    Idle,
    AwaitingModel,
    AwaitingUser(PromptKind),
    Completed,
    Aborted,
    Failed,
}

impl DialogueState {
    pub fn is_terminal(self) -> bool {
        matches!(self, DialogueState::Completed | DialogueState::Aborted | DialogueState::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_rendering() {
        assert_eq!(UserAnswer::Text("About Rust".into()).render(), "About Rust");
        assert_eq!(UserAnswer::Confirm(true).render(), "Yes");
        assert_eq!(UserAnswer::Confirm(false).render(), "No");
        assert_eq!(UserAnswer::Choice(0).render(), "№1");
        assert_eq!(UserAnswer::Choice(2).render(), "№3");
    }

    #[test]
    fn test_answer_fits_prompt() {
        assert!(UserAnswer::Choice(2).fits(PromptKind::Choice(3)));
        assert!(!UserAnswer::Choice(3).fits(PromptKind::Choice(3)));
        assert!(!UserAnswer::Text("x".into()).fits(PromptKind::Confirmation));
        assert!(UserAnswer::Confirm(false).fits(PromptKind::Confirmation));
    }

    #[test]
    fn test_prompt_kind() {
        let outcome = DialogueOutcome::NeedsChoice { prompt: "Pick".into(), options: vec!["a".into(), "b".into()] };
        assert_eq!(outcome.prompt_kind(), Some(PromptKind::Choice(2)));
        assert!(!outcome.is_terminal());
        assert!(DialogueOutcome::Failed { error: "x".into() }.is_terminal());
    }
}
