//! Text completion client module
//!
//! Provides the completion request type with the fixed sampling parameters
//! used for task generation, and the client trait the dialogue engine talks to.

use async_trait::async_trait;

mod openai;

pub use openai::{parse_completion, OpenAIClient};

use crate::error::Result;

/// Sampling parameters sent with every completion request
#[derive(Debug, Clone, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub stop: Vec<String>,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            max_tokens: 100,
            top_p: 1.0,
            frequency_penalty: 0.5,
            presence_penalty: 0.0,
            stop: vec![".".to_string()],
        }
    }
}

/// A completion request - one prompt, one reply
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub sampling: Sampling,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            sampling: Sampling::default(),
        }
    }
}

/// A text completion endpoint
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the request and return the raw reply text
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sampling() {
        let sampling = CompletionRequest::new("Topic").sampling;
        assert_eq!(sampling.temperature, 1.0);
        assert_eq!(sampling.max_tokens, 100);
        assert_eq!(sampling.top_p, 1.0);
        assert_eq!(sampling.frequency_penalty, 0.5);
        assert_eq!(sampling.presence_penalty, 0.0);
        assert_eq!(sampling.stop, vec!["."]);
    }
}
