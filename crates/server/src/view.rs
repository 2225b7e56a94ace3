//! Session view
//!
//! What the browser renders for a session. Everything here is derived from
//! the [`TranslatorSession`]; the page keeps no state of its own.

use serde::Serialize;

use translator_core::{SessionState, SessionStats, Translation, TranslatorSession};

/// Submit label while a request is in flight
pub const SUBMIT_LABEL_LOADING: &str = "Translating...";
/// Submit label otherwise
pub const SUBMIT_LABEL: &str = "Translate";

/// Sample shown before the first translation
#[derive(Debug, Clone, Serialize)]
pub struct ExampleTranslation {
    pub english: &'static str,
    pub spanish: &'static str,
    pub phonetic: &'static str,
}

pub const EXAMPLE: ExampleTranslation = ExampleTranslation {
    english: "hello",
    spanish: "Hola",
    phonetic: "O-la",
};

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub input: String,
    pub state: SessionState,
    pub loading: bool,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    /// Empty when there is nothing to show
    pub error: String,
    pub translation: Option<Translation>,
    pub show_example: bool,
    pub example: ExampleTranslation,
    pub stats: SessionStats,
}

impl SessionView {
    pub fn new(session_id: &str, session: &TranslatorSession) -> Self {
        let loading = session.is_loading();
        Self {
            session_id: session_id.to_string(),
            input: session.input().to_string(),
            state: session.state(),
            loading,
            submit_enabled: session.can_submit(),
            submit_label: if loading {
                SUBMIT_LABEL_LOADING
            } else {
                SUBMIT_LABEL
            },
            error: session.error_message().to_string(),
            translation: session.translation().cloned(),
            show_example: session.translation().is_none(),
            example: EXAMPLE,
            stats: session.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_view() {
        let view = SessionView::new("abc", &TranslatorSession::new());
        assert!(!view.loading);
        assert!(!view.submit_enabled);
        assert!(view.show_example);
        assert_eq!(view.submit_label, "Translate");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["state"], "idle");
        assert_eq!(json["translation"], serde_json::Value::Null);
        assert_eq!(json["example"]["spanish"], "Hola");
    }

    #[test]
    fn test_loading_view() {
        let mut session = TranslatorSession::new();
        session.set_input("hello");
        assert!(SessionView::new("abc", &session).submit_enabled);

        session.begin_submit().unwrap();
        let view = SessionView::new("abc", &session);
        assert!(view.loading);
        assert!(!view.submit_enabled);
        assert_eq!(view.submit_label, "Translating...");
    }

    #[test]
    fn test_translated_view_hides_example() {
        let mut session = TranslatorSession::new();
        session.set_input("hello");
        session.begin_submit().unwrap();
        session.resolve(&Ok(Translation::new("Hola", "O-la")));

        let json = serde_json::to_value(SessionView::new("abc", &session)).unwrap();
        assert_eq!(json["show_example"], false);
        assert_eq!(json["translation"]["spanish"], "Hola");
        assert_eq!(json["translation"]["phonetic"], "O-la");
        assert_eq!(json["error"], "");
    }
}
