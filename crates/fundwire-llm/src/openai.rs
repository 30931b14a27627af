//! OpenAI-compatible chat-completions client
//!
//! Talks to any endpoint speaking the `/v1/chat/completions` protocol: a
//! local server (LM Studio, Ollama's OpenAI shim) or a hosted service. The
//! endpoint URL and an optional bearer credential come from configuration,
//! never from code.
//!
//! One `complete` call issues exactly one request. Transport failures are
//! surfaced immediately and are never retried here; the extraction layer's
//! repair loop only re-enters for malformed *content*, which this client
//! does not inspect.

use crate::LlmError;
use async_trait::async_trait;
use fundwire_domain::{ChatMessage, ChatProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default endpoint, a local LM Studio-style server.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:1234/v1/chat/completions";

/// Default sampling temperature; near-deterministic extraction.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Default output-token budget per request.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Default request timeout (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for a chat-completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Full chat-completions URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bearer token attached as `Authorization` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Output-token budget per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LlmConfig {
    /// Apply `LLM_API_URL` and `LLM_API_KEY` environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("LLM_API_URL") {
            if !url.is_empty() {
                self.endpoint = url;
            }
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }
        self
    }
}

/// Chat-completion client for an OpenAI-compatible endpoint.
pub struct ChatClient {
    config: LlmConfig,
    client: reqwest::Client,
}

/// Request body for the chat-completions API.
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

/// Response from the chat-completions API.
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl ChatClient {
    /// Create a client from connection settings.
    pub fn new(config: LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { config, client }
    }

    /// Send the conversation, return the assistant's reply text.
    ///
    /// # Errors
    ///
    /// - `Communication`: connection failure or non-2xx status
    /// - `InvalidResponse`: body is not a chat completion or has no choices
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let body = ChatCompletionRequest {
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream: false,
        };

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        debug!(
            endpoint = %self.config.endpoint,
            turns = messages.len(),
            "sending chat completion request"
        );

        let response = request
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse response: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".to_string()))?;

        Ok(choice.message.content)
    }
}

#[async_trait]
impl ChatProvider for ChatClient {
    type Error = LlmError;

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, Self::Error> {
        ChatClient::complete(self, messages).await
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundwire_domain::Role;

    #[test]
    fn test_default_config() {
        let config = LlmConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.api_key.is_none());
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = LlmConfig {
            endpoint: "https://api.example.com/v1/chat/completions".to_string(),
            api_key: Some("secret".to_string()),
            ..LlmConfig::default()
        };
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: LlmConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.endpoint, config.endpoint);
        assert_eq!(parsed.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_config_partial_toml_uses_defaults() {
        let parsed: LlmConfig =
            toml::from_str(r#"endpoint = "http://127.0.0.1:8080/v1/chat/completions""#).unwrap();
        assert_eq!(parsed.endpoint, "http://127.0.0.1:8080/v1/chat/completions");
        assert_eq!(parsed.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(parsed.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_request_body_shape() {
        let messages = [
            ChatMessage::system("prompt"),
            ChatMessage::user("article"),
        ];
        let body = ChatCompletionRequest {
            messages: &messages,
            temperature: 0.1,
            max_tokens: 2000,
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["stream"], false);
        assert_eq!(json["max_tokens"], 2000);
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "{\"Montant\": \"5M\"}"}}
            ]
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "{\"Montant\": \"5M\"}");
    }

    #[tokio::test]
    async fn test_connection_error_is_communication() {
        // Nothing listens here; the request itself must fail.
        let client = ChatClient::new(LlmConfig {
            endpoint: "http://127.0.0.1:1/v1/chat/completions".to_string(),
            timeout_secs: 2,
            ..LlmConfig::default()
        });
        let result = client.complete(&[ChatMessage {
            role: Role::User,
            content: "test".to_string(),
        }]).await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
