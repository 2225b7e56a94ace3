//! Translator session
//!
//! All per-user state lives in one [`TranslatorSession`] value: the input
//! text, the last translation, the last error message and the request state.
//! Control flow is an explicit state machine:
//!
//! ```text
//!   Idle ──submit──▶ Submitting ──resolve──▶ Resolved(Success | Failure)
//!                        ▲                          │
//!                        └──────────submit──────────┘
//! ```
//!
//! The loading flag is derived from the state, so it cannot disagree with it.

use serde::Serialize;

use crate::error::EMPTY_INPUT_MESSAGE;
use crate::traits::{SpeechHandle, SpeechSynthesizer, Utterance};
use crate::{Result, TranslateError, Translation, VoiceConfig};

/// How the last request cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Success,
    Failure,
}

/// Request state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// One request in flight
    Submitting,
    /// Last request finished
    Resolved(Resolution),
}

impl SessionState {
    /// Stable name for views and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Resolved(Resolution::Success) => "succeeded",
            Self::Resolved(Resolution::Failure) => "failed",
        }
    }
}

impl Serialize for SessionState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Request counters for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
}

/// State of one translator user
#[derive(Debug, Clone, Default)]
pub struct TranslatorSession {
    input: String,
    state: SessionState,
    translation: Option<Translation>,
    error_message: String,
    last_error: Option<TranslateError>,
    stats: SessionStats,
    voice: VoiceConfig,
}

impl TranslatorSession {
    /// Create an empty session with the default voice
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session that speaks with `voice`
    pub fn with_voice(voice: VoiceConfig) -> Self {
        Self {
            voice,
            ..Default::default()
        }
    }

    /// Replace the input text
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True exactly while a request is in flight
    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Submitting
    }

    /// Last successful translation, kept across later failures
    pub fn translation(&self) -> Option<&Translation> {
        self.translation.as_ref()
    }

    /// User-facing error text; empty when there is none
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Detailed kind of the last failure, for diagnostics only
    pub fn last_error(&self) -> Option<&TranslateError> {
        self.last_error.as_ref()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn voice(&self) -> &VoiceConfig {
        &self.voice
    }

    /// Whether the submit control should be enabled
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && !self.input.trim().is_empty()
    }

    /// Start a request cycle.
    ///
    /// Returns the trimmed input to translate and moves to `Submitting`,
    /// clearing the error message. Empty input records the empty-input
    /// message and leaves the state alone. A second submit while one is in
    /// flight is rejected without touching the session.
    pub fn begin_submit(&mut self) -> Result<String> {
        if self.is_loading() {
            return Err(TranslateError::AlreadyInFlight);
        }

        let text = self.input.trim();
        if text.is_empty() {
            self.error_message = EMPTY_INPUT_MESSAGE.to_string();
            self.last_error = Some(TranslateError::EmptyInput);
            return Err(TranslateError::EmptyInput);
        }

        let text = text.to_string();
        self.state = SessionState::Submitting;
        self.error_message.clear();
        self.stats.attempts += 1;
        Ok(text)
    }

    /// Finish the request cycle started by [`begin_submit`](Self::begin_submit).
    ///
    /// Success replaces the translation and clears the error; failure sets
    /// the user message and keeps the previous translation. Returns `false`
    /// (and changes nothing) if no request was in flight.
    pub fn resolve(&mut self, outcome: &Result<Translation>) -> bool {
        if !self.is_loading() {
            tracing::warn!(state = self.state.as_str(), "resolve called with no request in flight");
            return false;
        }

        match outcome {
            Ok(translation) => {
                self.translation = Some(translation.clone());
                self.error_message.clear();
                self.last_error = None;
                self.stats.successes += 1;
                self.state = SessionState::Resolved(Resolution::Success);
            },
            Err(err) => {
                self.error_message = err.user_message().to_string();
                self.last_error = Some(err.clone());
                self.stats.failures += 1;
                self.state = SessionState::Resolved(Resolution::Failure);
            },
        }
        true
    }

    /// Speak the Spanish text of the current translation.
    ///
    /// Returns `None` without calling the synthesizer when there is nothing
    /// to say.
    pub fn speak(&self, synth: &dyn SpeechSynthesizer) -> Option<SpeechHandle> {
        let spanish = self
            .translation
            .as_ref()
            .map(Translation::spanish)
            .filter(|s| !s.is_empty())?;

        let utterance = Utterance::new(spanish, &self.voice);
        tracing::debug!(
            utterance_id = %utterance.id,
            synthesizer = synth.name(),
            lang = %utterance.language,
            "Speaking translation"
        );
        Some(synth.speak(utterance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TRANSLATION_FAILED_MESSAGE;
    use crate::traits::SpeechOutcome;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingSynth {
        spoken: Mutex<Vec<Utterance>>,
    }

    impl SpeechSynthesizer for RecordingSynth {
        fn speak(&self, utterance: Utterance) -> SpeechHandle {
            let id = utterance.id;
            self.spoken.lock().push(utterance);
            SpeechHandle::finished(id, SpeechOutcome::Completed)
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn hola() -> Translation {
        Translation::new("Hola", "O-la")
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = TranslatorSession::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.is_loading());
        assert!(session.translation().is_none());
        assert_eq!(session.error_message(), "");
        assert!(!session.can_submit());
    }

    #[test]
    fn test_empty_input_rejected() {
        let mut session = TranslatorSession::new();
        session.set_input("   \n\t");

        assert_eq!(session.begin_submit(), Err(TranslateError::EmptyInput));
        assert_eq!(session.error_message(), EMPTY_INPUT_MESSAGE);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.is_loading());
        assert_eq!(session.stats().attempts, 0);
    }

    #[test]
    fn test_success_cycle() {
        let mut session = TranslatorSession::new();
        session.set_input("  hello ");

        let text = session.begin_submit().unwrap();
        assert_eq!(text, "hello");
        assert!(session.is_loading());
        assert!(!session.can_submit());

        assert!(session.resolve(&Ok(hola())));
        assert!(!session.is_loading());
        assert_eq!(session.state(), SessionState::Resolved(Resolution::Success));
        assert_eq!(session.translation(), Some(&hola()));
        assert_eq!(session.error_message(), "");
    }

    #[test]
    fn test_failure_keeps_previous_translation() {
        let mut session = TranslatorSession::new();
        session.set_input("hello");
        session.begin_submit().unwrap();
        session.resolve(&Ok(hola()));

        session.set_input("goodbye");
        session.begin_submit().unwrap();
        session.resolve(&Err(TranslateError::RequestFailed(500)));

        assert_eq!(session.state(), SessionState::Resolved(Resolution::Failure));
        assert_eq!(session.translation(), Some(&hola()));
        assert_eq!(session.error_message(), TRANSLATION_FAILED_MESSAGE);
        assert_eq!(session.last_error(), Some(&TranslateError::RequestFailed(500)));
    }

    #[test]
    fn test_new_attempt_clears_error() {
        let mut session = TranslatorSession::new();
        session.set_input("hello");
        session.begin_submit().unwrap();
        session.resolve(&Err(TranslateError::MalformedResponse("prose".into())));
        assert!(!session.error_message().is_empty());

        session.begin_submit().unwrap();
        assert_eq!(session.error_message(), "");
    }

    #[test]
    fn test_second_submit_while_in_flight() {
        let mut session = TranslatorSession::new();
        session.set_input("hello");
        session.begin_submit().unwrap();

        assert_eq!(session.begin_submit(), Err(TranslateError::AlreadyInFlight));
        assert!(session.is_loading());
        assert_eq!(session.error_message(), "");
        assert_eq!(session.stats().attempts, 1);
    }

    #[test]
    fn test_resolve_without_submit_is_ignored() {
        let mut session = TranslatorSession::new();
        assert!(!session.resolve(&Ok(hola())));
        assert!(session.translation().is_none());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_stats_across_cycles() {
        let mut session = TranslatorSession::new();
        session.set_input("hello");
        for outcome in [Ok(hola()), Err(TranslateError::RequestFailed(429)), Ok(hola())] {
            session.begin_submit().unwrap();
            assert!(session.is_loading());
            session.resolve(&outcome);
            assert!(!session.is_loading());
        }
        assert_eq!(
            session.stats(),
            SessionStats {
                attempts: 3,
                successes: 2,
                failures: 1
            }
        );
    }

    #[test]
    fn test_speak_without_translation_is_noop() {
        let synth = RecordingSynth::default();
        let session = TranslatorSession::new();
        assert!(session.speak(&synth).is_none());
        assert!(synth.spoken.lock().is_empty());
    }

    #[test]
    fn test_speak_with_empty_spanish_is_noop() {
        let synth = RecordingSynth::default();
        let mut session = TranslatorSession::new();
        session.set_input("hello");
        session.begin_submit().unwrap();
        session.resolve(&Ok(Translation::new("", "")));
        assert!(session.speak(&synth).is_none());
    }

    #[tokio::test]
    async fn test_speak_uses_session_voice() {
        let synth = RecordingSynth::default();
        let mut session = TranslatorSession::new();
        session.set_input("hello");
        session.begin_submit().unwrap();
        session.resolve(&Ok(hola()));

        let handle = session.speak(&synth).unwrap();
        assert_eq!(handle.wait().await, SpeechOutcome::Completed);

        let spoken = synth.spoken.lock();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].text, "Hola");
        assert_eq!(spoken[0].language, "es-ES");
        assert_eq!(spoken[0].rate, 0.8);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(SessionState::Idle.as_str(), "idle");
        assert_eq!(
            serde_json::to_value(SessionState::Resolved(Resolution::Failure)).unwrap(),
            "failed"
        );
    }
}
