//! Background generation session.
//!
//! The engine runs on a tokio task; the UI polls for outcomes without
//! blocking and pushes answers back. At most one outcome waits in the
//! channel, so the worker never runs ahead of the prompts the user sees.

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::engine::DialogueEngine;
use super::types::{DialogueOutcome, UserAnswer};
use crate::error::Error;

/// Handle to a running generation session.
///
/// Dropping it stops the worker; starting a new session simply replaces
/// the old handle.
pub struct GenerationSession {
    outcomes: mpsc::Receiver<DialogueOutcome>,
    answers: mpsc::UnboundedSender<UserAnswer>,
    worker: JoinHandle<()>,
}

impl GenerationSession {
    /// Spawn the engine on `handle` and start it with `topic`.
    pub fn spawn(handle: &Handle, engine: DialogueEngine, topic: impl Into<String>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(1);
        let (answer_tx, answer_rx) = mpsc::unbounded_channel();
        let worker = handle.spawn(drive(engine, topic.into(), outcome_tx, answer_rx));
        Self { outcomes: outcome_rx, answers: answer_tx, worker }
    }

    /// Take the next outcome if one is ready.
    pub fn try_next(&mut self) -> Option<DialogueOutcome> {
        match self.outcomes.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait for the next outcome; `None` once the worker is gone.
    pub async fn next(&mut self) -> Option<DialogueOutcome> {
        self.outcomes.recv().await
    }

    /// Send the user's answer to the waiting engine.
    ///
    /// An answer that does not fit the current prompt is dropped by the
    /// worker, which keeps waiting for a fitting one.
    pub fn reply(&self, answer: UserAnswer) -> bool {
        self.answers.send(answer).is_ok()
    }

    /// Whether the worker has exited and no outcome is left to read.
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished() && self.outcomes.is_empty()
    }
}

impl Drop for GenerationSession {
    fn drop(&mut self) {
        if !self.worker.is_finished() {
            debug!("GenerationSession: dropped while running, aborting worker");
            self.worker.abort();
        }
    }
}

async fn drive(
    mut engine: DialogueEngine,
    topic: String,
    outcomes: mpsc::Sender<DialogueOutcome>,
    mut answers: mpsc::UnboundedReceiver<UserAnswer>,
) {
    let mut outcome = engine
        .start(&topic)
        .await
        .unwrap_or_else(|e| DialogueOutcome::Failed { error: e.to_string() });
    loop {
        let terminal = outcome.is_terminal();
        if outcomes.send(outcome).await.is_err() {
            debug!("drive: receiver gone");
            return;
        }
        if terminal {
            info!(
                state = ?engine.state(),
                topic = %engine.topic(),
                source = engine.source_language().unwrap_or("?"),
                "drive: session finished"
            );
            return;
        }
        outcome = loop {
            let Some(answer) = answers.recv().await else {
                debug!("drive: answer channel closed");
                return;
            };
            match engine.answer(answer).await {
                Ok(next) => break next,
                // The engine is still waiting on the same prompt.
                Err(Error::Validation(reason)) => warn!(%reason, "drive: answer rejected"),
                Err(e) => break DialogueOutcome::Failed { error: e.to_string() },
            }
        };
    }
}
