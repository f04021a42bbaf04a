//! Conversation history replayed into every prompt.

/// Who said a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Ai,
    User,
}

impl Speaker {
    fn label(self) -> &'static str {
        match self {
            Speaker::Ai => "AI",
            Speaker::User => "Answer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub text: String,
}

/// Append-only list of turns for one generation session.
#[derive(Debug, Clone, Default)]
pub struct History {
    turns: Vec<ConversationTurn>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ai(&mut self, text: impl Into<String>) {
        self.turns.push(ConversationTurn { speaker: Speaker::Ai, text: text.into() });
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(ConversationTurn { speaker: Speaker::User, text: text.into() });
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render as prompt lines, ending with an open `AI:` turn for the model to fill.
    pub fn render(&self) -> String {
        if self.turns.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        for turn in &self.turns {
            out.push('\n');
            out.push_str(turn.speaker.label());
            out.push_str(": ");
            out.push_str(&turn.text);
        }
        out.push_str("\nAI:");
        out
    }
}
