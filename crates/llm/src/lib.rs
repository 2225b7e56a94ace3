//! Completion service integration
//!
//! Implements [`CompletionBackend`](translator_core::CompletionBackend) on top
//! of the Anthropic Messages API.

pub mod claude;

pub use claude::{ClaudeBackend, ClaudeConfig};

use thiserror::Error;
use translator_core::TranslateError;

/// Completion service errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: HTTP {status}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

impl From<LlmError> for TranslateError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api { status, .. } => TranslateError::RequestFailed(status),
            LlmError::InvalidResponse(msg) => TranslateError::MalformedResponse(msg),
            LlmError::Network(msg) | LlmError::Configuration(msg) => {
                TranslateError::Transport(msg)
            },
        }
    }
}
