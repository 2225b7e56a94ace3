//! Speech synthesis trait
//!
//! Speaking is fire-and-forget for the session, but every call hands back a
//! [`SpeechHandle`] so a caller that does care can wait for the outcome or
//! cancel the utterance.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::VoiceConfig;

/// One request to speak a piece of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Correlates completion reports with the request
    pub id: Uuid,
    /// Text to speak
    pub text: String,
    /// BCP-47 language tag
    #[serde(rename = "lang")]
    pub language: String,
    /// Rate multiplier
    pub rate: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>, voice: &VoiceConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            language: voice.language.clone(),
            rate: voice.rate,
        }
    }
}

/// How an utterance ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SpeechOutcome {
    /// Spoken to the end
    Completed,
    /// Stopped before the end (cancelled, interrupted, never acknowledged)
    Cancelled,
    /// The synthesizer reported an error
    Failed { reason: String },
}

/// Caller side of an utterance
#[derive(Debug)]
pub struct SpeechHandle {
    id: Uuid,
    outcome_rx: oneshot::Receiver<SpeechOutcome>,
    cancel_tx: Option<oneshot::Sender<()>>,
}

/// Synthesizer side of an utterance
#[derive(Debug)]
pub struct SpeechCompletion {
    id: Uuid,
    outcome_tx: oneshot::Sender<SpeechOutcome>,
    cancel_rx: oneshot::Receiver<()>,
}

impl SpeechHandle {
    /// Create a connected handle/completion pair for utterance `id`
    pub fn pair(id: Uuid) -> (SpeechHandle, SpeechCompletion) {
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        (
            SpeechHandle {
                id,
                outcome_rx,
                cancel_tx: Some(cancel_tx),
            },
            SpeechCompletion {
                id,
                outcome_tx,
                cancel_rx,
            },
        )
    }

    /// Handle for an utterance that already finished
    pub fn finished(id: Uuid, outcome: SpeechOutcome) -> SpeechHandle {
        let (handle, completion) = Self::pair(id);
        completion.complete(outcome);
        handle
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Ask the synthesizer to stop. Has no effect after the first call.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for the utterance to end.
    ///
    /// A synthesizer that drops its completion without reporting counts as
    /// a failure.
    pub async fn wait(self) -> SpeechOutcome {
        self.outcome_rx.await.unwrap_or_else(|_| SpeechOutcome::Failed {
            reason: "synthesizer dropped the utterance".to_string(),
        })
    }
}

impl SpeechCompletion {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Report the outcome. Ignored if the handle is gone.
    pub fn complete(self, outcome: SpeechOutcome) {
        let _ = self.outcome_tx.send(outcome);
    }

    /// Resolves to `true` once the caller cancels, `false` if the handle
    /// was dropped without cancelling.
    pub async fn cancelled(&mut self) -> bool {
        (&mut self.cancel_rx).await.is_ok()
    }
}

/// Platform speech synthesis
///
/// Implementations:
/// - `BrowserSpeechRelay` - forwards utterances to the browser's speech synthesis
pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// Start speaking. Returns immediately; overlapping utterances follow the
    /// synthesizer's own queueing.
    fn speak(&self, utterance: Utterance) -> SpeechHandle;

    /// Get synthesizer name for logging
    fn name(&self) -> &str;
}
