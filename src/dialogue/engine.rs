//! The auto-generation dialogue engine.
//!
//! One engine drives one session: translate the topic, ask the model,
//! classify its reply, and either finish, stop, or wait for the user.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::classify::{classify, normalize_reply, Classification};
use super::history::History;
use super::types::{DialogueOutcome, DialogueState, UserAnswer};
use crate::error::{Error, Result};
use crate::llm::{CompletionClient, CompletionRequest};
use crate::translate::Translator;

/// Instructions and worked examples sent ahead of every topic.
const INSTRUCTIONS: &str = "Create a title, description and reward for provided topic, if there is too few \
information provided, you can ask for more using one of this methods: \
chooseOption \"Message\" | option that splitted with `|` (you will get number of option in answer), \
getText \"What text you want to get\", \
getTrue \"Binary question with yes or no answers\" and \
endDialog \"message\" if you want to end it, can be used if got unclear commands multiple times.\
Format answer like: \"title, description, reward\".\n\n\
EXAMPLE #1:\n\
Topic: \"Finish my project\"\n\
AI: getText \"What is your project about?\"\n\
Answer: About creating TODO list using python\n\
AI: \"Project finishing, Finish my TODO list project in Python and publish it to github, +1 project in the portfolio\"\n\n\
EXAMPLE #2:\n\
Topic: \"Doing my homework\"\n\
AI: \"Homework, Finish my homework until 22:00, Good mark tomorrow\"\n\n";

/// Build the full prompt for a topic and the conversation so far.
pub fn build_prompt(topic: &str, history: &History) -> String {
    format!("{INSTRUCTIONS}Topic: \"{topic}\"{}", history.render())
}

pub struct DialogueEngine {
    translator: Arc<dyn Translator>,
    completion: Arc<dyn CompletionClient>,
    pivot_language: String,
    state: DialogueState,
    topic: String,
    source_language: Option<String>,
    history: History,
}

impl DialogueEngine {
    pub fn new(
        translator: Arc<dyn Translator>,
        completion: Arc<dyn CompletionClient>,
        pivot_language: impl Into<String>,
    ) -> Self {
        Self {
            translator,
            completion,
            pivot_language: pivot_language.into(),
            state: DialogueState::Idle,
            topic: String::new(),
            source_language: None,
            history: History::new(),
        }
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Topic after translation into the pivot language.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Language the user wrote the topic in, once detected.
    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    /// Begin the session with a topic.
    ///
    /// Errors only when the engine was already started or the topic is
    /// blank; remote failures come back as `DialogueOutcome::Failed`.
    pub async fn start(&mut self, topic: &str) -> Result<DialogueOutcome> {
        if self.state != DialogueState::Idle {
            return Err(Error::Validation("This session has already started".into()));
        }
        if topic.trim().is_empty() {
            return Err(Error::Validation("Topic cannot be empty".into()));
        }
        info!(topic_len = topic.len(), "start: translating topic");
        self.state = DialogueState::AwaitingModel;

        match self.translator.translate(topic.trim(), &self.pivot_language).await {
            Ok(translation) => {
                debug!(source = %translation.source_language, "start: topic translated");
                self.topic = translation.text;
                self.source_language = Some(translation.source_language);
            }
            Err(e) => return Ok(self.fail(e)),
        }
        Ok(self.round_trip().await)
    }

    /// Answer the prompt the model asked and run the next round trip.
    pub async fn answer(&mut self, answer: UserAnswer) -> Result<DialogueOutcome> {
        let DialogueState::AwaitingUser(kind) = self.state else {
            return Err(Error::Validation(format!("Not waiting for an answer (state {:?})", self.state)));
        };
        if !answer.fits(kind) {
            return Err(Error::Validation(format!("Answer {answer:?} does not fit prompt {kind:?}")));
        }
        self.history.push_user(answer.render());
        Ok(self.round_trip().await)
    }

    async fn round_trip(&mut self) -> DialogueOutcome {
        self.state = DialogueState::AwaitingModel;
        let prompt = build_prompt(&self.topic, &self.history);
        debug!(turns = self.history.len(), "round_trip: requesting completion");
        match self.completion.complete(CompletionRequest::new(prompt)).await {
            Ok(raw) => self.consume_reply(&raw),
            Err(e) => self.fail(e),
        }
    }

    fn consume_reply(&mut self, raw: &str) -> DialogueOutcome {
        let reply = normalize_reply(raw);
        debug!(%reply, "consume_reply: normalised");
        if !reply.is_empty() {
            self.history.push_ai(reply.clone());
        }
        let outcome = match classify(&reply) {
            Classification::Outcome(outcome) => outcome,
            Classification::Unparseable(text) => {
                warn!(%text, "consume_reply: reply matched no known shape");
                return self.fail(Error::Parse(text));
            }
        };
        self.state = match &outcome {
            DialogueOutcome::Completed { .. } => DialogueState::Completed,
            DialogueOutcome::Aborted { .. } => DialogueState::Aborted,
            DialogueOutcome::Failed { .. } => DialogueState::Failed,
            other => match other.prompt_kind() {
                Some(kind) => DialogueState::AwaitingUser(kind),
                None => DialogueState::Failed,
            },
        };
        info!(state = ?self.state, "consume_reply: classified");
        outcome
    }

    fn fail(&mut self, error: Error) -> DialogueOutcome {
        warn!(%error, transport = error.is_transport(), "dialogue failed");
        self.state = DialogueState::Failed;
        DialogueOutcome::Failed { error: error.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::testing::{FakeTranslator, ScriptedModel};
    use crate::dialogue::types::PromptKind;

    fn engine(model: Arc<ScriptedModel>) -> DialogueEngine {
        DialogueEngine::new(Arc::new(FakeTranslator { fail: false }), model, "en")
    }

    #[tokio::test]
    async fn test_completes_on_first_reply() {
        let model = ScriptedModel::new(vec![Ok(" \"Homework, Finish my homework until 22:00, Good mark tomorrow\".".into())]);
        let mut engine = engine(model.clone());
        let outcome = engine.start("Делать домашку").await.unwrap();
        assert_eq!(
            outcome,
            DialogueOutcome::Completed {
                title: "Homework".into(),
                description: "Finish my homework until 22:00".into(),
                reward: "Good mark tomorrow".into(),
            }
        );
        assert_eq!(engine.state(), DialogueState::Completed);
        assert_eq!(engine.source_language(), Some("ru"));
        let prompts = model.prompts();
        assert!(prompts[0].ends_with("Topic: \"Делать домашку (en)\""));
    }

    #[tokio::test]
    async fn test_text_question_then_completion() {
        let model = ScriptedModel::new(vec![
            Ok("getText \"What is your project about?\"".into()),
            Ok("Project finishing, Publish the TODO app, +1 portfolio project".into()),
        ]);
        let mut engine = engine(model.clone());
        let first = engine.start("Finish my project").await.unwrap();
        assert_eq!(first, DialogueOutcome::NeedsText { prompt: "What is your project about?".into() });
        assert_eq!(engine.state(), DialogueState::AwaitingUser(PromptKind::Text));
        assert_eq!(engine.history().len(), 1);

        let second = engine.answer(UserAnswer::Text("A TODO list in Python".into())).await.unwrap();
        assert!(matches!(second, DialogueOutcome::Completed { .. }));
        assert_eq!(engine.history().len(), 3);

        let prompts = model.prompts();
        assert!(prompts[1].ends_with(
            "\nAI: getText What is your project about?\nAnswer: A TODO list in Python\nAI:"
        ));
    }

    #[tokio::test]
    async fn test_choice_and_confirmation_answers_are_rendered() {
        let model = ScriptedModel::new(vec![
            Ok("chooseOption \"Pick one\" | Red | Green | Blue".into()),
            Ok("getTrue \"Is it urgent?\"".into()),
            Ok("endDialog \"Not enough information\"".into()),
        ]);
        let mut engine = engine(model.clone());
        engine.start("Paint the fence").await.unwrap();
        engine.answer(UserAnswer::Choice(1)).await.unwrap();
        assert_eq!(engine.state(), DialogueState::AwaitingUser(PromptKind::Confirmation));
        let last = engine.answer(UserAnswer::Confirm(false)).await.unwrap();
        assert_eq!(last, DialogueOutcome::Aborted { message: "Not enough information".into() });
        assert_eq!(engine.state(), DialogueState::Aborted);

        let prompts = model.prompts();
        assert!(prompts[1].contains("\nAnswer: №2\nAI:"));
        assert!(prompts[2].contains("\nAnswer: No\nAI:"));
        assert_eq!(engine.history().len(), 5);
    }

    #[tokio::test]
    async fn test_wrong_answer_kind_is_rejected() {
        let model = ScriptedModel::new(vec![Ok("chooseOption Pick | a | b".into())]);
        let mut engine = engine(model);
        engine.start("Topic").await.unwrap();
        assert!(matches!(engine.answer(UserAnswer::Choice(2)).await, Err(Error::Validation(_))));
        assert!(matches!(engine.answer(UserAnswer::Text("a".into())).await, Err(Error::Validation(_))));
        assert_eq!(engine.state(), DialogueState::AwaitingUser(PromptKind::Choice(2)));
        assert_eq!(engine.history().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_fails_session() {
        let model = ScriptedModel::new(vec![Err(Error::Api { status: 401, message: "bad key".into() })]);
        let mut engine = engine(model);
        let outcome = engine.start("Topic").await.unwrap();
        assert_eq!(outcome, DialogueOutcome::Failed { error: "API error 401: bad key".into() });
        assert_eq!(engine.state(), DialogueState::Failed);
        assert!(engine.answer(UserAnswer::Text("x".into())).await.is_err());
    }

    #[tokio::test]
    async fn test_translation_error_fails_session() {
        let model = ScriptedModel::new(vec![]);
        let mut engine = DialogueEngine::new(Arc::new(FakeTranslator { fail: true }), model.clone(), "en");
        let outcome = engine.start("Topic").await.unwrap();
        assert!(matches!(outcome, DialogueOutcome::Failed { .. }));
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_empty_reply_is_rejection() {
        let model = ScriptedModel::new(vec![Ok("  .  ".into())]);
        let mut engine = engine(model);
        let outcome = engine.start("Topic").await.unwrap();
        assert_eq!(outcome, DialogueOutcome::Aborted { message: String::new() });
        assert!(engine.history().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_reply_fails_instead_of_stalling() {
        let model = ScriptedModel::new(vec![Ok("Sure! Here is your task".into())]);
        let mut engine = engine(model);
        match engine.start("Topic").await.unwrap() {
            DialogueOutcome::Failed { error } => assert!(error.contains("Sure! Here is your task")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(engine.state(), DialogueState::Failed);
    }

    #[tokio::test]
    async fn test_start_validates() {
        let model = ScriptedModel::new(vec![Ok("a, b, c".into())]);
        let mut engine = engine(model);
        assert!(matches!(engine.start("  ").await, Err(Error::Validation(_))));
        engine.start("Topic").await.unwrap();
        assert!(matches!(engine.start("Again").await, Err(Error::Validation(_))));
    }

    #[test]
    fn test_build_prompt_without_history() {
        let prompt = build_prompt("Doing my homework", &History::new());
        assert!(prompt.starts_with("Create a title, description and reward"));
        assert!(prompt.ends_with("Topic: \"Doing my homework\""));
    }
}
