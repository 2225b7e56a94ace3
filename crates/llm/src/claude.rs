//! Claude backend
//!
//! Sends one non-streaming request to the Anthropic Messages API per
//! translation and returns the text of the first content block.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use translator_config::constants::{endpoints, llm};
use translator_config::LlmSettings;
use translator_core::{CompletionBackend, TranslateError};

use crate::LlmError;

/// Configuration for Claude backend
#[derive(Debug, Clone)]
pub struct ClaudeConfig {
    /// API key (from config or `ANTHROPIC_API_KEY`)
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Request timeout
    pub timeout: Duration,
    /// API base URL (for testing or proxy)
    pub endpoint: String,
    /// `anthropic-version` header
    pub anthropic_version: String,
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var(llm::API_KEY_ENV).unwrap_or_default(),
            model: llm::DEFAULT_MODEL.to_string(),
            max_tokens: llm::DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(llm::DEFAULT_TIMEOUT_SECS),
            endpoint: endpoints::ANTHROPIC_DEFAULT.to_string(),
            anthropic_version: llm::ANTHROPIC_VERSION.to_string(),
        }
    }
}

impl ClaudeConfig {
    /// Create config with API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Build from the `llm` settings section
    pub fn from_settings(settings: &LlmSettings) -> Self {
        Self {
            api_key: settings.api_key().unwrap_or_default().to_string(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            timeout: Duration::from_secs(settings.timeout_seconds),
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            anthropic_version: settings.anthropic_version.clone(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn messages_url(&self) -> String {
        format!("{}{}", self.endpoint, endpoints::MESSAGES_PATH)
    }
}

/// Anthropic Messages API backend
pub struct ClaudeBackend {
    config: ClaudeConfig,
    client: Client,
}

impl ClaudeBackend {
    /// Create a new Claude backend
    pub fn new(config: ClaudeConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Configuration(format!(
                "{} not set. Set it via environment or config.",
                llm::API_KEY_ENV
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClaudeConfig {
        &self.config
    }

    /// Send `prompt` as a single user message and return the first text block
    pub async fn send(&self, prompt: &str) -> Result<String, LlmError> {
        let request = ClaudeRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: [ClaudeMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.config.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.anthropic_version)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %body, "Messages API error body");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        extract_reply(&body)
    }
}

/// First content item's text from a Messages API response body
fn extract_reply(body: &str) -> Result<String, LlmError> {
    let response: ClaudeApiResponse =
        serde_json::from_str(body).map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

    match response.content.into_iter().next() {
        Some(ClaudeContentBlock {
            text: Some(text), ..
        }) => Ok(text),
        Some(block) => Err(LlmError::InvalidResponse(format!(
            "first content block of type '{}' has no text",
            block.kind
        ))),
        None => Err(LlmError::InvalidResponse("empty content".to_string())),
    }
}

#[async_trait]
impl CompletionBackend for ClaudeBackend {
    async fn complete(&self, prompt: &str) -> Result<String, TranslateError> {
        Ok(self.send(prompt).await?)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Claude API types

#[derive(Debug, Serialize)]
struct ClaudeRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    messages: [ClaudeMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ClaudeMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClaudeApiResponse {
    content: Vec<ClaudeContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ClaudeContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}
