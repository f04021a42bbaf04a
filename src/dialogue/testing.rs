//! Scripted stand-ins for the remote services, shared by the dialogue tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::llm::{CompletionClient, CompletionRequest};
use crate::translate::{Translation, Translator};

/// Appends ` (en)` to the text and reports Russian as the source.
pub struct FakeTranslator {
    pub fail: bool,
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<Translation> {
        if self.fail {
            return Err(Error::Api { status: 503, message: "unavailable".into() });
        }
        Ok(Translation { text: format!("{text} ({target})"), source_language: "ru".into() })
    }
}

/// Replays canned replies and records every prompt it was sent.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self { replies: Mutex::new(replies.into()), prompts: Mutex::new(Vec::new()) })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.prompts.lock().unwrap().push(request.prompt);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::InvalidResponse("script exhausted".into())))
    }
}
