//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::RwLock;

use translator_config::Settings;
use translator_core::{CompletionBackend, RequestDispatcher, VoiceConfig};

use crate::session::SessionManager;
use crate::speech::BrowserSpeechRelay;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Settings>>,
    pub sessions: Arc<SessionManager>,
    pub dispatcher: RequestDispatcher,
    pub speech: BrowserSpeechRelay,
    /// `None` when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create application state around a completion backend
    pub fn new(config: Settings, backend: Arc<dyn CompletionBackend>) -> Self {
        let voice = VoiceConfig::default()
            .with_language(config.speech.language.clone())
            .with_rate(config.speech.rate);
        let sessions = SessionManager::with_config(&config.sessions).with_voice(voice);
        let speech = BrowserSpeechRelay::new(Duration::from_secs(config.speech.ack_timeout_seconds));

        Self {
            sessions: Arc::new(sessions),
            dispatcher: RequestDispatcher::new(backend),
            speech,
            metrics: None,
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Serve metrics from `handle`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a clone of the current configuration
    pub fn get_config(&self) -> Settings {
        self.config.read().clone()
    }
}
