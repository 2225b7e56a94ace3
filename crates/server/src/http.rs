//! HTTP Endpoints
//!
//! JSON API for translator sessions plus the browser page.

use std::time::{Duration, Instant};

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::Html,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use translator_core::{handle_key, KeyEvent, SpeechOutcome, TranslateError, Utterance};

use crate::metrics::{metrics_handler, record_translation};
use crate::session::Session;
use crate::state::AppState;
use crate::view::SessionView;
use crate::ServerError;

const INDEX_HTML: &str = include_str!("../static/index.html");
const DEFAULT_DEV_ORIGIN: &str = "http://localhost:8080";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let config = state.config.read();
    let cors_layer = build_cors_layer(&config.server.cors_origins, config.server.cors_enabled);
    let timeout = Duration::from_secs(config.server.timeout_seconds);
    drop(config);

    Router::new()
        // Browser page
        .route("/", get(index))
        // Session endpoints
        .route("/api/sessions", post(create_session).get(list_sessions))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/sessions/:id/input", put(set_input))
        .route("/api/sessions/:id/translate", post(translate))
        .route("/api/sessions/:id/keys", post(key_press))
        .route("/api/sessions/:id/speak", post(speak))
        .route("/api/sessions/:id/speech/:utterance_id", post(report_speech))
        // Health check
        .route("/health", get(health_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty or all invalid, allows only the local page
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    if parsed_origins.is_empty() {
        tracing::info!("No valid CORS origins configured, defaulting to {}", DEFAULT_DEV_ORIGIN);
        return layer.allow_origin(HeaderValue::from_static(DEFAULT_DEV_ORIGIN));
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    layer.allow_origin(parsed_origins)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

fn view_of(session: &Session) -> SessionView {
    SessionView::new(&session.id, &session.translator.read())
}

/// Run one request cycle for `session`.
///
/// Only a concurrent submit is an HTTP error; every other outcome is
/// reported through the view.
async fn run_translate(state: &AppState, session: &Session) -> Result<SessionView, ServerError> {
    let span = tracing::info_span!(
        "translate",
        session_id = %session.id,
        input_len = session.translator.read().input().trim().len()
    );

    let start = Instant::now();
    let outcome = state
        .dispatcher
        .submit(&session.translator)
        .instrument(span)
        .await;
    record_translation(&outcome, start.elapsed());
    session.touch();

    match outcome {
        Err(TranslateError::AlreadyInFlight) => Err(ServerError::Conflict(
            "A translation is already in progress".to_string(),
        )),
        _ => Ok(view_of(session)),
    }
}

/// Create session
async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), ServerError> {
    let session = state.sessions.create()?;
    Ok((StatusCode::CREATED, Json(view_of(&session))))
}

/// List sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions: Vec<serde_json::Value> = state
        .sessions
        .summaries()
        .into_iter()
        .map(|(id, created_at)| {
            serde_json::json!({ "id": id, "created_at": created_at.to_rfc3339() })
        })
        .collect();
    Json(serde_json::json!({
        "count": sessions.len(),
        "sessions": sessions,
    }))
}

/// Get session view
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ServerError> {
    let session = state.sessions.require(&id)?;
    Ok(Json(view_of(&session)))
}

/// Delete session
async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.sessions.remove(&id);
    StatusCode::NO_CONTENT
}

#[derive(Debug, Deserialize)]
struct InputRequest {
    text: String,
}

/// Replace input text
async fn set_input(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<InputRequest>,
) -> Result<Json<SessionView>, ServerError> {
    let session = state.sessions.require(&id)?;
    session.translator.write().set_input(request.text);
    Ok(Json(view_of(&session)))
}

/// Submit the current input
async fn translate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ServerError> {
    let session = state.sessions.require(&id)?;
    let view = run_translate(&state, &session).await?;
    Ok(Json(view))
}

#[derive(Debug, Serialize)]
struct KeyResponse {
    prevent_default: bool,
    view: SessionView,
}

/// Key press in the input area
async fn key_press(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(event): Json<KeyEvent>,
) -> Result<Json<KeyResponse>, ServerError> {
    let session = state.sessions.require(&id)?;
    let action = handle_key(&event);

    let view = if action.prevents_default() {
        match run_translate(&state, &session).await {
            Ok(view) => view,
            // Enter during a request is swallowed
            Err(ServerError::Conflict(_)) => view_of(&session),
            Err(e) => return Err(e),
        }
    } else {
        view_of(&session)
    };

    Ok(Json(KeyResponse {
        prevent_default: action.prevents_default(),
        view,
    }))
}

#[derive(Debug, Serialize)]
struct SpeakResponse {
    utterance: Option<Utterance>,
}

/// Speak the current translation
async fn speak(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SpeakResponse>, ServerError> {
    let session = state.sessions.require(&id)?;
    let relay = state.speech.for_session(&session.id);
    let handle = session.translator.read().speak(&relay);
    let utterance = handle.and_then(|h| state.speech.utterance(h.id()));

    if let Some(utterance) = &utterance {
        tracing::info!(session_id = %id, utterance_id = %utterance.id, "Utterance sent to browser");
    }
    Ok(Json(SpeakResponse { utterance }))
}

/// Browser report of how an utterance ended
async fn report_speech(
    State(state): State<AppState>,
    Path((id, utterance_id)): Path<(String, Uuid)>,
    Json(outcome): Json<SpeechOutcome>,
) -> Result<StatusCode, ServerError> {
    state.sessions.require(&id)?;

    if state.speech.report(&id, utterance_id, outcome) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::Session(format!(
            "Utterance not pending: {}",
            utterance_id
        )))
    }
}

/// Health check
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.dispatcher.model_name(),
        "sessions": state.sessions.count(),
    }))
}
