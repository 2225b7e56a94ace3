//! Translation error taxonomy
//!
//! Every failure of a request cycle is one of these kinds. The kind is kept
//! for logging and metrics; users only ever see [`TranslateError::user_message`].

use thiserror::Error;

/// Shown when the user submits empty or whitespace-only text.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text to translate";

/// Shown for every failure other than empty input.
pub const TRANSLATION_FAILED_MESSAGE: &str = "Failed to translate. Please try again.";

/// Translation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// Trimmed input was empty; no request was sent
    #[error("Input text is empty")]
    EmptyInput,

    /// The completion service answered with a non-success HTTP status
    #[error("Translation request failed with HTTP status {0}")]
    RequestFailed(u16),

    /// The request never produced an HTTP status (connect, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(String),

    /// A payload arrived but could not be turned into a translation
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The session already has a request in flight
    #[error("A translation request is already in flight")]
    AlreadyInFlight,

    /// The in-flight request was dropped or panicked before resolving
    #[error("Translation request was interrupted")]
    Interrupted,
}

impl TranslateError {
    /// The text shown to the user for this failure
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyInput => EMPTY_INPUT_MESSAGE,
            _ => TRANSLATION_FAILED_MESSAGE,
        }
    }

    /// Short label for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::RequestFailed(_) => "request_failed",
            Self::Transport(_) => "transport",
            Self::MalformedResponse(_) => "malformed_response",
            Self::AlreadyInFlight => "already_in_flight",
            Self::Interrupted => "interrupted",
        }
    }
}

impl From<serde_json::Error> for TranslateError {
    fn from(err: serde_json::Error) -> Self {
        TranslateError::MalformedResponse(err.to_string())
    }
}

/// Result alias used across the translator crates
pub type Result<T> = std::result::Result<T, TranslateError>;
