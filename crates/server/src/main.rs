//! Translator Server Entry Point

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use translator_config::{load_settings, Settings};
use translator_llm::{ClaudeBackend, ClaudeConfig};
use translator_server::{create_router, init_metrics, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Priority: env vars > config/{env}.toml > config/default.toml > defaults
    let env = std::env::var("TRANSLATOR_ENV").ok();
    // Missing files fall back to defaults; invalid values stop startup
    let config = load_settings(env.as_deref()).map_err(|e| {
        // Tracing not yet initialized
        eprintln!("Invalid configuration: {}", e);
        e
    })?;
    eprintln!(
        "Loaded configuration (env: {})",
        env.as_deref().unwrap_or("default")
    );

    init_tracing(&config);

    tracing::info!("Starting Translator Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?config.environment,
        model = %config.llm.model,
        speech_language = %config.speech.language,
        "Configuration loaded"
    );

    let backend = ClaudeBackend::new(ClaudeConfig::from_settings(&config.llm)).map_err(|e| {
        tracing::error!(error = %e, "Cannot create completion backend");
        e
    })?;

    let mut state = AppState::new(config.clone(), Arc::new(backend));
    if config.observability.metrics_enabled {
        if let Some(handle) = init_metrics() {
            tracing::info!("Initialized Prometheus metrics at /metrics");
            state = state.with_metrics(handle);
        }
    }

    let cleanup_shutdown = state.sessions.start_cleanup_task();

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = cleanup_shutdown.send(true);
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("translator={level},translator_core={level},translator_llm={level},translator_server={level},tower_http=debug").into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    subscriber.with(fmt_layer).init();
}
