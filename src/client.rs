//! Remote model boundary.
//!
//! [`ModelEndpoint`] is the seam the retry invoker operates through, so the
//! retry state machine is testable with scripted in-memory endpoints. The
//! production implementation talks to the Anthropic Messages API over
//! blocking HTTP.

use crate::error::{Error, Result};
use crate::prompt::Prompt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

const API_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const MAX_RESPONSE_TOKENS: u32 = 4096;

// Low temperature keeps review output deterministic enough to diff between
// runs.
const TEMPERATURE: f32 = 0.3;

/// Remote model identifier, restricted to a fixed enumerated set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelId {
    /// Balanced default model
    #[default]
    Sonnet,
    /// Fast, inexpensive model
    Haiku,
    /// Most capable model
    Opus,
}

impl ModelId {
    /// Returns the concrete API model name.
    #[must_use]
    pub const fn api_name(self) -> &'static str {
        match self {
            Self::Sonnet => "claude-3-5-sonnet-20241022",
            Self::Haiku => "claude-3-5-haiku-20241022",
            Self::Opus => "claude-3-opus-20240229",
        }
    }

    /// Returns all supported models.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Sonnet, Self::Haiku, Self::Opus]
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

/// A remote endpoint capable of answering one prompt with text.
///
/// One `send` is one attempt; retry policy lives entirely in the invoker.
pub trait ModelEndpoint {
    /// Sends the prompt to the named model and returns the response text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with the HTTP status for remote rejections
    /// (429 being the retryable rate-limit signal) and [`Error::Http`] for
    /// transport failures.
    fn send(&self, model: ModelId, prompt: &Prompt) -> Result<String>;
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

/// Production endpoint for the Anthropic Messages API.
pub struct AnthropicEndpoint {
    client: reqwest::blocking::Client,
    api_key: String,
}

impl AnthropicEndpoint {
    /// Creates an endpoint using the credential from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if the API key variable is unset
    /// or empty. Callers check this before any collection work starts.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::missing_credential(API_KEY_VAR))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        debug!("Anthropic client initialized");

        Ok(Self { client, api_key })
    }
}

impl ModelEndpoint for AnthropicEndpoint {
    fn send(&self, model: ModelId, prompt: &Prompt) -> Result<String> {
        let body = MessagesRequest {
            model: model.api_name(),
            max_tokens: MAX_RESPONSE_TOKENS,
            temperature: TEMPERATURE,
            system: &prompt.system,
            messages: vec![Message {
                role: "user",
                content: &prompt.user,
            }],
        };

        let response = self
            .client
            .post(format!("{API_BASE_URL}/v1/messages"))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().unwrap_or_default();
            return Err(Error::api(status.as_u16(), body_text));
        }

        let parsed: MessagesResponse = response.json()?;

        if let Some(usage) = parsed.usage {
            info!(
                "Model answered: {} input tokens, {} output tokens",
                usage.input_tokens, usage.output_tokens
            );
        }

        parsed
            .content
            .first()
            .map(|block| block.text.clone())
            .ok_or_else(|| Error::api(status.as_u16(), "response carried no content blocks"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_api_names() {
        assert_eq!(ModelId::Sonnet.api_name(), "claude-3-5-sonnet-20241022");
        assert_eq!(ModelId::Haiku.api_name(), "claude-3-5-haiku-20241022");
        assert_eq!(ModelId::Opus.api_name(), "claude-3-opus-20240229");
    }

    #[test]
    fn test_model_set_is_fixed() {
        assert_eq!(ModelId::all().len(), 3);
        assert_eq!(ModelId::default(), ModelId::Sonnet);
    }

    #[test]
    fn test_request_serialization() {
        let request = MessagesRequest {
            model: ModelId::Sonnet.api_name(),
            max_tokens: MAX_RESPONSE_TOKENS,
            temperature: TEMPERATURE,
            system: "system prompt",
            messages: vec![Message {
                role: "user",
                content: "user prompt",
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "claude-3-5-sonnet-20241022");
        assert_eq!(json["max_tokens"], 4096);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "user prompt");
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{
            "content": [{"type": "text", "text": "Looks good."}],
            "usage": {"input_tokens": 12, "output_tokens": 4}
        }"#;

        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.content[0].text, "Looks good.");
        assert_eq!(parsed.usage.unwrap().input_tokens, 12);
    }

    #[test]
    fn test_response_parsing_without_usage() {
        let raw = r#"{"content": [{"text": "ok"}]}"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.usage.is_none());
    }
}
