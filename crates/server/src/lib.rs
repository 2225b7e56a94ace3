//! Translator Server
//!
//! Hosts translator sessions behind a small JSON API and serves the browser
//! page that drives them.

pub mod http;
pub mod metrics;
pub mod session;
pub mod speech;
pub mod state;
pub mod view;

pub use http::create_router;
pub use metrics::{init_metrics, record_speech_outcome, record_translation};
pub use session::{Session, SessionManager};
pub use speech::BrowserSpeechRelay;
pub use state::AppState;
pub use view::SessionView;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Session capacity reached ({0})")]
    Capacity(usize),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<&ServerError> for StatusCode {
    fn from(err: &ServerError) -> Self {
        match err {
            ServerError::Session(_) => StatusCode::NOT_FOUND,
            ServerError::Capacity(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        if status.is_server_error() {
            tracing::warn!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
