//! Browser speech relay
//!
//! The server has no audio device. Utterances are handed to the browser,
//! which speaks them with the Web Speech API and reports how each one ended.
//! Utterances the browser never reports resolve as cancelled after the
//! acknowledgement timeout. A relay scoped with [`BrowserSpeechRelay::for_session`]
//! only accepts reports from the session that spoke.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use uuid::Uuid;

use translator_core::{SpeechHandle, SpeechOutcome, SpeechSynthesizer, Utterance};

use crate::metrics::record_speech_outcome;

struct PendingUtterance {
    utterance: Utterance,
    /// Session that spoke; `None` for an unscoped relay
    owner: Option<String>,
    report_tx: oneshot::Sender<SpeechOutcome>,
}

impl PendingUtterance {
    fn owned_by(&self, session_id: &str) -> bool {
        self.owner.as_deref().map_or(true, |owner| owner == session_id)
    }
}

/// [`SpeechSynthesizer`] that forwards utterances to the browser
#[derive(Clone)]
pub struct BrowserSpeechRelay {
    pending: Arc<Mutex<HashMap<Uuid, PendingUtterance>>>,
    ack_timeout: Duration,
    owner: Option<String>,
}

impl BrowserSpeechRelay {
    pub fn new(ack_timeout: Duration) -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            ack_timeout,
            owner: None,
        }
    }

    /// Relay sharing this one's pending map whose utterances belong to
    /// `session_id`
    pub fn for_session(&self, session_id: impl Into<String>) -> Self {
        Self {
            pending: Arc::clone(&self.pending),
            ack_timeout: self.ack_timeout,
            owner: Some(session_id.into()),
        }
    }

    /// Utterance awaiting a browser report
    pub fn utterance(&self, id: Uuid) -> Option<Utterance> {
        self.pending.lock().get(&id).map(|p| p.utterance.clone())
    }

    /// Number of utterances awaiting a report
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Record the report from session `session_id` for utterance `id`.
    ///
    /// Returns `false` if the utterance is unknown, already resolved, or
    /// belongs to another session. A rejected report leaves the utterance
    /// pending.
    pub fn report(&self, session_id: &str, id: Uuid, outcome: SpeechOutcome) -> bool {
        match self.pending.lock().entry(id) {
            Entry::Occupied(entry) if entry.get().owned_by(session_id) => {
                let _ = entry.remove().report_tx.send(outcome);
                true
            },
            Entry::Occupied(_) => {
                tracing::warn!(
                    session_id = %session_id,
                    utterance_id = %id,
                    "Speech report from a session that does not own the utterance"
                );
                false
            },
            Entry::Vacant(_) => false,
        }
    }
}

impl SpeechSynthesizer for BrowserSpeechRelay {
    fn speak(&self, utterance: Utterance) -> SpeechHandle {
        let id = utterance.id;
        let (handle, mut completion) = SpeechHandle::pair(id);
        let (report_tx, report_rx) = oneshot::channel();

        self.pending.lock().insert(
            id,
            PendingUtterance {
                utterance,
                owner: self.owner.clone(),
                report_tx,
            },
        );

        let pending = Arc::clone(&self.pending);
        let ack_timeout = self.ack_timeout;

        tokio::spawn(async move {
            let outcome = tokio::select! {
                reported = report_rx => reported.unwrap_or(SpeechOutcome::Cancelled),
                true = completion.cancelled() => SpeechOutcome::Cancelled,
                _ = tokio::time::sleep(ack_timeout) => {
                    tracing::debug!(utterance_id = %id, "No speech report before timeout");
                    SpeechOutcome::Cancelled
                }
            };
            pending.lock().remove(&id);

            match &outcome {
                SpeechOutcome::Failed { reason } => {
                    tracing::warn!(utterance_id = %id, reason = %reason, "Speech failed")
                },
                other => tracing::info!(utterance_id = %id, outcome = ?other, "Speech finished"),
            }
            record_speech_outcome(&outcome);
            completion.complete(outcome);
        });

        handle
    }

    fn name(&self) -> &str {
        "browser"
    }
}
