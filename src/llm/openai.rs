//! OpenAI legacy completions API client
//!
//! Implements the CompletionClient trait for the `/v1/completions` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{CompletionClient, CompletionRequest};
use crate::config::LlmConfig;
use crate::error::{Error, Result};

/// OpenAI completions client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenAIClient {
    /// Create a new client from configuration and a resolved API key
    pub fn from_config(config: &LlmConfig, api_key: String) -> Result<Self> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        if api_key.trim().is_empty() {
            return Err(Error::Config(format!(
                "No API key. Run `tb key <KEY>` or set {}",
                config.api_key_env
            )));
        }
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        let s = &request.sampling;
        serde_json::json!({
            "model": self.model,
            "prompt": request.prompt,
            "temperature": s.temperature,
            "max_tokens": s.max_tokens,
            "top_p": s.top_p,
            "frequency_penalty": s.frequency_penalty,
            "presence_penalty": s.presence_penalty,
            "stop": s.stop,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    text: String,
}

/// Extract the first choice's text from a response body.
pub fn parse_completion(body: &str) -> Result<String> {
    let response: CompletionResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.text)
        .ok_or_else(|| Error::InvalidResponse("completion has no choices".into()))
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        debug!(model = %self.model, prompt_len = request.prompt.len(), "complete: called");
        let url = format!("{}/v1/completions", self.base_url);
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        if !(200..300).contains(&status) {
            debug!(%status, "complete: API error");
            return Err(Error::Api { status, message: text });
        }

        debug!("complete: success");
        parse_completion(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAIClient {
        OpenAIClient::from_config(&LlmConfig::default(), "sk-test".to_string()).unwrap()
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let err = OpenAIClient::from_config(&LlmConfig::default(), " ".to_string()).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_request_body_carries_sampling() {
        let body = client().build_request_body(&CompletionRequest::new("Topic: \"x\""));
        assert_eq!(body["prompt"], "Topic: \"x\"");
        assert_eq!(body["max_tokens"], 100);
        assert_eq!(body["frequency_penalty"], 0.5);
        assert_eq!(body["stop"][0], ".");
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{"id":"cmpl-1","choices":[{"text":" getText \"What is it about?\"","index":0}]}"#;
        assert_eq!(parse_completion(body).unwrap(), " getText \"What is it about?\"");
    }

    #[test]
    fn test_parse_completion_without_choices() {
        assert!(matches!(parse_completion(r#"{"choices":[]}"#), Err(Error::InvalidResponse(_))));
        assert!(matches!(parse_completion("<html>"), Err(Error::Json(_))));
    }
}
