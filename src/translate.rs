//! Machine translation client
//!
//! Sends free text to the public translation endpoint and returns the
//! translated text together with the detected source language.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::TranslateConfig;
use crate::error::{Error, Result};

/// Result of one translation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub source_language: String,
}

/// Anything that can translate text into a target language.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target: &str) -> Result<Translation>;
}

/// Client for the `translate_a/single` endpoint.
pub struct GoogleTranslator {
    base_url: String,
    http: Client,
}

impl GoogleTranslator {
    pub fn from_config(config: &TranslateConfig) -> Result<Self> {
        debug!(?config, "from_config: called");
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<Translation> {
        if text.trim().is_empty() {
            return Err(Error::Validation("Nothing to translate".into()));
        }
        debug!(%target, text_len = text.len(), "translate: called");
        let url = format!("{}/translate_a/single", self.base_url);
        let response = self
            .http
            .get(url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "translate: API error");
            return Err(Error::Api { status: status.as_u16(), message });
        }

        let body: Value = response.json().await?;
        parse_translation(&body)
    }
}

/// Pull the translated text and detected language out of a response body.
///
/// The first segment of the first element is the translation; the third
/// top-level element is the source language code.
pub fn parse_translation(body: &Value) -> Result<Translation> {
    let text = body
        .get(0)
        .and_then(|v| v.get(0))
        .and_then(|v| v.get(0))
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidResponse("translation text missing".into()))?;
    let source_language = body
        .get(2)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidResponse("source language missing".into()))?;
    Ok(Translation {
        text: capitalize(text),
        source_language: source_language.to_string(),
    })
}

/// First letter upper-cased, the rest lower-cased.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_translation() {
        let body = json!([[["finish my project", "закончить мой проект", null, null, 10]], null, "ru"]);
        let t = parse_translation(&body).unwrap();
        assert_eq!(t.text, "Finish my project");
        assert_eq!(t.source_language, "ru");
    }

    #[test]
    fn test_parse_translation_malformed() {
        assert!(matches!(parse_translation(&json!({"error": 1})), Err(Error::InvalidResponse(_))));
        assert!(matches!(parse_translation(&json!([[["ok"]], null])), Err(Error::InvalidResponse(_))));
        assert!(parse_translation(&json!([[[42]], null, "en"])).is_err());
    }

    #[test]
    fn test_capitalize_unicode() {
        assert_eq!(capitalize("éclair"), "Éclair");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("learn RUST with Ferris"), "Learn rust with ferris");
    }

    #[tokio::test]
    async fn test_translate_rejects_empty_text() {
        let translator = GoogleTranslator::from_config(&TranslateConfig::default()).unwrap();
        assert!(matches!(translator.translate("   ", "en").await, Err(Error::Validation(_))));
    }
}
