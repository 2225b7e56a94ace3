//! Session Management
//!
//! One [`Session`] per browser tab, each owning a [`TranslatorSession`].
//! Sessions expire after a period without activity; a background task sweeps
//! them out.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use translator_config::SessionSettings;
use translator_core::{TranslatorSession, VoiceConfig};

use crate::ServerError;

/// Translator session hosted by the server
pub struct Session {
    /// Session ID
    pub id: String,
    /// Translator state
    pub translator: RwLock<TranslatorSession>,
    /// Creation time (wall clock, for listings)
    pub created_at: DateTime<Utc>,
    /// Last activity
    last_activity: RwLock<Instant>,
}

impl Session {
    /// Create a new session
    pub fn new(id: impl Into<String>, voice: VoiceConfig) -> Self {
        Self {
            id: id.into(),
            translator: RwLock::new(TranslatorSession::with_voice(voice)),
            created_at: Utc::now(),
            last_activity: RwLock::new(Instant::now()),
        }
    }

    /// Update last activity
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    /// Check if session is expired. A session with a request in flight
    /// never expires.
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.read().elapsed() > timeout && !self.translator.read().is_loading()
    }
}

/// Session manager
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    max_sessions: usize,
    session_timeout: Duration,
    cleanup_interval: Duration,
    voice: VoiceConfig,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(max_sessions: usize) -> Self {
        Self::with_config(&SessionSettings {
            max_sessions,
            ..Default::default()
        })
    }

    /// Create a session manager from the `sessions` settings section
    pub fn with_config(settings: &SessionSettings) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: settings.max_sessions,
            session_timeout: Duration::from_secs(settings.idle_timeout_seconds),
            cleanup_interval: Duration::from_secs(settings.cleanup_interval_seconds),
            voice: VoiceConfig::default(),
        }
    }

    /// Voice given to new sessions
    pub fn with_voice(mut self, voice: VoiceConfig) -> Self {
        self.voice = voice;
        self
    }

    /// Start a background task that periodically removes expired sessions.
    ///
    /// Returns a shutdown sender; send `true` to stop the task.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.cleanup_interval;

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let removed = manager.cleanup_expired();
                        if removed > 0 {
                            tracing::info!(
                                removed,
                                remaining = manager.count(),
                                "Session cleanup removed expired sessions"
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Create a new session
    pub fn create(&self) -> Result<Arc<Session>, ServerError> {
        let mut sessions = self.sessions.write();

        if sessions.len() >= self.max_sessions {
            self.cleanup_expired_internal(&mut sessions);

            if sessions.len() >= self.max_sessions {
                return Err(ServerError::Capacity(self.max_sessions));
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(Session::new(&id, self.voice.clone()));
        sessions.insert(id.clone(), session.clone());

        tracing::info!(session_id = %id, active = sessions.len(), "Created session");
        Ok(session)
    }

    /// Get a session by ID, marking it active
    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        let session = self.sessions.read().get(id).cloned()?;
        session.touch();
        Some(session)
    }

    /// Get a session or a not-found error
    pub fn require(&self, id: &str) -> Result<Arc<Session>, ServerError> {
        self.get(id)
            .ok_or_else(|| ServerError::Session(format!("Session not found: {}", id)))
    }

    /// Remove a session
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().remove(id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Removed session");
        }
        removed
    }

    /// Number of sessions
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Remove expired sessions, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        self.cleanup_expired_internal(&mut sessions)
    }

    fn cleanup_expired_internal(&self, sessions: &mut HashMap<String, Arc<Session>>) -> usize {
        let timeout = self.session_timeout;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_expired(timeout))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            sessions.remove(id);
            tracing::info!(session_id = %id, "Expired session");
        }
        expired.len()
    }

    /// Session IDs with creation times, oldest first
    pub fn summaries(&self) -> Vec<(String, DateTime<Utc>)> {
        let mut summaries: Vec<_> = self
            .sessions
            .read()
            .values()
            .map(|s| (s.id.clone(), s.created_at))
            .collect();
        summaries.sort_by_key(|(_, created_at)| *created_at);
        summaries
    }
}
