//! Prometheus metrics

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use translator_core::{SpeechOutcome, Translation, TranslateError};

use crate::state::AppState;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the global Prometheus recorder.
///
/// Safe to call more than once; later calls return the first handle.
pub fn init_metrics() -> Option<PrometheusHandle> {
    HANDLE
        .get_or_try_init(|| PrometheusBuilder::new().install_recorder())
        .map_err(|e| tracing::error!(error = %e, "Failed to install Prometheus recorder"))
        .ok()
        .cloned()
}

/// Record the result of one translate call
pub fn record_translation(outcome: &Result<Translation, TranslateError>, elapsed: Duration) {
    let label = match outcome {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };
    metrics::counter!("translator_requests_total", "outcome" => label).increment(1);

    // Rejected submits never reach the completion service
    if !matches!(
        outcome,
        Err(TranslateError::EmptyInput | TranslateError::AlreadyInFlight)
    ) {
        metrics::histogram!("translator_request_duration_seconds").record(elapsed.as_secs_f64());
    }
}

/// Record how an utterance ended
pub fn record_speech_outcome(outcome: &SpeechOutcome) {
    let label = match outcome {
        SpeechOutcome::Completed => "completed",
        SpeechOutcome::Cancelled => "cancelled",
        SpeechOutcome::Failed { .. } => "failed",
    };
    metrics::counter!("translator_speech_total", "outcome" => label).increment(1);
}

/// `GET /metrics`
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}
