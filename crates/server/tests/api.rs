//! Router integration tests
//!
//! Drive the full router with a scripted completion backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tower::ServiceExt;

use translator_config::Settings;
use translator_core::{CompletionBackend, Result, TranslateError};
use translator_server::{create_router, AppState};

struct ScriptedBackend {
    replies: Mutex<Vec<Result<String>>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedBackend {
    fn new(replies: Vec<Result<String>>) -> Arc<Self> {
        Self::with_delay(replies, Duration::ZERO)
    }

    fn with_delay(replies: Vec<Result<String>>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            calls: AtomicUsize::new(0),
            delay,
        })
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.replies
            .lock()
            .pop()
            .unwrap_or_else(|| Err(TranslateError::Transport("no reply queued".into())))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

const HOLA: &str = r#"{"spanish":"Hola","phonetic":"O-la"}"#;

fn app(backend: Arc<ScriptedBackend>) -> Router {
    create_router(AppState::new(Settings::default(), backend))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn new_session(app: &Router) -> String {
    let (status, view) = send(app, "POST", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    view["session_id"].as_str().unwrap().to_string()
}

async fn set_input(app: &Router, id: &str, text: &str) -> Value {
    let (status, view) = send(
        app,
        "PUT",
        &format!("/api/sessions/{id}/input"),
        Some(json!({ "text": text })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    view
}

#[tokio::test]
async fn test_new_session_shows_example() {
    let app = app(ScriptedBackend::new(vec![]));
    let id = new_session(&app).await;

    let (status, view) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["show_example"], true);
    assert_eq!(view["example"]["english"], "hello");
    assert_eq!(view["submit_enabled"], false);
    assert_eq!(view["state"], "idle");
}

#[tokio::test]
async fn test_translate_hello() {
    let backend = ScriptedBackend::new(vec![Ok(HOLA.into())]);
    let app = app(backend.clone());
    let id = new_session(&app).await;

    let view = set_input(&app, &id, "hello").await;
    assert_eq!(view["submit_enabled"], true);

    let (status, view) = send(&app, "POST", &format!("/api/sessions/{id}/translate"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["translation"], json!({"spanish": "Hola", "phonetic": "O-la"}));
    assert_eq!(view["error"], "");
    assert_eq!(view["loading"], false);
    assert_eq!(view["show_example"], false);
    assert_eq!(view["state"], "succeeded");
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_whitespace_input_issues_no_call() {
    let backend = ScriptedBackend::new(vec![]);
    let app = app(backend.clone());
    let id = new_session(&app).await;
    set_input(&app, &id, "  ").await;

    let (status, view) = send(&app, "POST", &format!("/api/sessions/{id}/translate"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["error"], "Please enter some text to translate");
    assert_eq!(view["loading"], false);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failure_keeps_previous_translation() {
    let backend = ScriptedBackend::new(vec![
        Ok(HOLA.into()),
        Err(TranslateError::RequestFailed(500)),
    ]);
    let app = app(backend);
    let id = new_session(&app).await;
    set_input(&app, &id, "hello").await;
    send(&app, "POST", &format!("/api/sessions/{id}/translate"), None).await;

    set_input(&app, &id, "goodbye").await;
    let (status, view) = send(&app, "POST", &format!("/api/sessions/{id}/translate"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["error"], "Failed to translate. Please try again.");
    assert_eq!(view["translation"]["spanish"], "Hola");
    assert_eq!(view["loading"], false);
    assert_eq!(view["state"], "failed");
}

#[tokio::test]
async fn test_enter_submits_and_shift_enter_passes() {
    let backend = ScriptedBackend::new(vec![Ok(HOLA.into())]);
    let app = app(backend.clone());
    let id = new_session(&app).await;
    set_input(&app, &id, "hello").await;

    let uri = format!("/api/sessions/{id}/keys");
    let (_, res) = send(&app, "POST", &uri, Some(json!({"key": "Enter", "shift": true}))).await;
    assert_eq!(res["prevent_default"], false);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);

    let (_, res) = send(&app, "POST", &uri, Some(json!({"key": "a"}))).await;
    assert_eq!(res["prevent_default"], false);

    let (status, res) = send(&app, "POST", &uri, Some(json!({"key": "Enter"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["prevent_default"], true);
    assert_eq!(res["view"]["translation"]["spanish"], "Hola");
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_submit_conflicts() {
    let backend = ScriptedBackend::with_delay(vec![Ok(HOLA.into())], Duration::from_millis(200));
    let app = app(backend.clone());
    let id = new_session(&app).await;
    set_input(&app, &id, "hello").await;

    let uri = format!("/api/sessions/{id}/translate");
    let first = {
        let app = app.clone();
        let uri = uri.clone();
        tokio::spawn(async move { send(&app, "POST", &uri, None).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let (_, view) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(view["loading"], true);
    assert_eq!(view["submit_label"], "Translating...");

    let (status, body) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, view) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["loading"], false);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);

    // The rejected tab re-reads the session and sees it settle
    let (_, view) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(view["loading"], false);
    assert_eq!(view["submit_label"], "Translate");
    assert_eq!(view["translation"]["spanish"], "Hola");
}

#[tokio::test]
async fn test_speak_round_trip() {
    let app = app(ScriptedBackend::new(vec![Ok(HOLA.into())]));
    let id = new_session(&app).await;

    let (_, res) = send(&app, "POST", &format!("/api/sessions/{id}/speak"), None).await;
    assert_eq!(res["utterance"], Value::Null);

    set_input(&app, &id, "hello").await;
    send(&app, "POST", &format!("/api/sessions/{id}/translate"), None).await;

    let (status, res) = send(&app, "POST", &format!("/api/sessions/{id}/speak"), None).await;
    assert_eq!(status, StatusCode::OK);
    let utterance = &res["utterance"];
    assert_eq!(utterance["text"], "Hola");
    assert_eq!(utterance["lang"], "es-ES");
    assert_eq!(utterance["rate"], 0.8);

    let report_uri = format!(
        "/api/sessions/{id}/speech/{}",
        utterance["id"].as_str().unwrap()
    );
    let (status, _) = send(&app, "POST", &report_uri, Some(json!({"outcome": "completed"}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "POST", &report_uri, Some(json!({"outcome": "completed"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_speech_report_from_other_session_rejected() {
    let app = app(ScriptedBackend::new(vec![Ok(HOLA.into())]));
    let owner = new_session(&app).await;
    let other = new_session(&app).await;

    set_input(&app, &owner, "hello").await;
    send(&app, "POST", &format!("/api/sessions/{owner}/translate"), None).await;
    let (_, res) = send(&app, "POST", &format!("/api/sessions/{owner}/speak"), None).await;
    let utterance_id = res["utterance"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/sessions/{other}/speech/{utterance_id}"),
        Some(json!({"outcome": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/sessions/{owner}/speech/{utterance_id}"),
        Some(json!({"outcome": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_unknown_session() {
    let app = app(ScriptedBackend::new(vec![]));
    let (status, body) = send(&app, "GET", "/api/sessions/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("nope"));

    let (status, _) = send(&app, "POST", "/api/sessions/nope/translate", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_capacity_and_delete() {
    let mut settings = Settings::default();
    settings.sessions.max_sessions = 1;
    let app = create_router(AppState::new(settings, ScriptedBackend::new(vec![])));

    let id = new_session(&app).await;
    let (status, _) = send(&app, "POST", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (_, list) = send(&app, "GET", "/api/sessions", None).await;
    assert_eq!(list["count"], 1);

    let (status, _) = send(&app, "DELETE", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    new_session(&app).await;
}

#[tokio::test]
async fn test_health_and_index() {
    let app = app(ScriptedBackend::new(vec![]));
    let (status, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["model"], "scripted");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = app(ScriptedBackend::new(vec![]));
    let (status, _) = send(&app, "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .build_recorder()
        .handle();
    let state = AppState::new(Settings::default(), ScriptedBackend::new(vec![])).with_metrics(handle);
    let (status, _) = send(&create_router(state), "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
}
