//! Task auto-generation dialogue.
//!
//! The engine exchanges prompts with a completion model until the model
//! returns a finished task, gives up, or fails. Sessions run it in the
//! background for the TUI.

mod classify;
mod engine;
mod history;
mod session;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::{classify, normalize_reply, Classification};
pub use engine::{build_prompt, DialogueEngine};
pub use history::{ConversationTurn, History, Speaker};
pub use session::GenerationSession;
pub use types::{DialogueOutcome, DialogueState, PromptKind, UserAnswer};

use std::sync::Arc;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::llm::OpenAIClient;
use crate::translate::GoogleTranslator;

/// Build an engine wired to the configured translation and completion services.
///
/// `stored_key` is the key kept in the state file, used when the configured
/// environment variable is unset.
pub fn engine_from_config(config: &Config, stored_key: &str) -> Result<DialogueEngine> {
    let api_key = config.llm.api_key(stored_key).ok_or_else(|| {
        Error::Config(format!(
            "No API key. Run `tb key <KEY>` or set {}",
            config.llm.api_key_env
        ))
    })?;
    let translator = Arc::new(GoogleTranslator::from_config(&config.translate)?);
    let completion = Arc::new(OpenAIClient::from_config(&config.llm, api_key)?);
    Ok(DialogueEngine::new(
        translator,
        completion,
        config.translate.pivot_language.clone(),
    ))
}
