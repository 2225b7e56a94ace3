//! Request dispatcher
//!
//! Turns input text into one completion request and the reply into a
//! [`Translation`]. [`RequestDispatcher::submit`] additionally walks a
//! [`TranslatorSession`] through a full request cycle and guarantees the
//! session leaves `Submitting` on every exit path.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use crate::parser::parse_translation;
use crate::prompt::build_translation_prompt;
use crate::session::TranslatorSession;
use crate::traits::CompletionBackend;
use crate::{Result, TranslateError, Translation};

/// Sends translation requests to a completion backend
#[derive(Clone)]
pub struct RequestDispatcher {
    backend: Arc<dyn CompletionBackend>,
}

impl RequestDispatcher {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Model used by the backend
    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    /// Translate `input` with exactly one backend request.
    ///
    /// Empty or whitespace-only input fails with `EmptyInput` before any
    /// request is made.
    pub async fn translate(&self, input: &str) -> Result<Translation> {
        let text = input.trim();
        if text.is_empty() {
            return Err(TranslateError::EmptyInput);
        }

        let prompt = build_translation_prompt(text);
        let raw = self.backend.complete(&prompt).await?;

        parse_translation(&raw).map_err(|e| {
            tracing::warn!(
                error = %e,
                reply_len = raw.len(),
                "Model reply is not a translation object"
            );
            e
        })
    }

    /// Run one request cycle on `session`.
    ///
    /// The session lock is only held to start and to resolve the cycle,
    /// never across the backend call.
    pub async fn submit(&self, session: &RwLock<TranslatorSession>) -> Result<Translation> {
        let text = {
            let mut session = session.write();
            session.begin_submit()?
        };

        let guard = InFlightGuard::new(session);
        let start = Instant::now();
        let outcome = self.translate(&text).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &outcome {
            Ok(_) => tracing::info!(
                model = self.model_name(),
                input_len = text.len(),
                elapsed_ms,
                "Translation succeeded"
            ),
            Err(e) => tracing::error!(
                model = self.model_name(),
                kind = e.kind(),
                error = %e,
                elapsed_ms,
                "Translation failed"
            ),
        }

        guard.resolve(&outcome);
        outcome
    }
}

/// Resolves the session as `Interrupted` if the cycle is abandoned
/// (future dropped or backend panicked) before [`resolve`](Self::resolve).
struct InFlightGuard<'a> {
    session: &'a RwLock<TranslatorSession>,
    resolved: bool,
}

impl<'a> InFlightGuard<'a> {
    fn new(session: &'a RwLock<TranslatorSession>) -> Self {
        Self {
            session,
            resolved: false,
        }
    }

    fn resolve(mut self, outcome: &Result<Translation>) {
        self.session.write().resolve(outcome);
        self.resolved = true;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.resolved {
            tracing::warn!("Translation request abandoned before completion");
            self.session
                .write()
                .resolve(&Err(TranslateError::Interrupted));
        }
    }
}
