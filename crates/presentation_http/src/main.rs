//! Soil classifier HTTP server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use application::{ClassificationService, ClassifierPort};
use infrastructure::{
    AppConfig, ModelFetcher, OnnxClassifierAdapter, SecurityValidator, WarningSeverity,
    init_telemetry,
};
use presentation_http::{routes, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration decides the log format, so load it before logging is up
    let loaded = AppConfig::load();
    let config = loaded.as_ref().map_or_else(|_| AppConfig::default(), Clone::clone);

    init_telemetry(config.server.log_format, &config.server.log_filter)?;

    if let Err(e) = &loaded {
        warn!("Failed to load config, using defaults: {}", e);
    }

    info!("🌱 Soil classifier v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        environment = %config.environment(),
        host = %config.server.host,
        port = %config.server.port,
        model = %config.model.path.display(),
        "Configuration loaded"
    );

    run_security_checks(&config)?;

    // Obtain and load the model artifact
    let fetcher = ModelFetcher::from_config(&config.model)?;
    let model_path = fetcher
        .ensure_present(&config.model)
        .await
        .context("Failed to obtain model artifact")?;

    let input_size = config.model.input_size;
    let adapter =
        tokio::task::spawn_blocking(move || OnnxClassifierAdapter::load(&model_path, input_size))
            .await
            .context("Model loading task failed")?
            .context("Failed to load classifier model")?;

    let classifier: Arc<dyn ClassifierPort> = Arc::new(adapter);
    let classification_service = ClassificationService::new(classifier);

    let state = AppState {
        classification_service: Arc::new(classification_service),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = routes::create_router(state);

    // Configure CORS layer
    let cors_layer = if config.server.allowed_origins.is_empty() {
        // Development mode: allow all origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use axum::http::{HeaderValue, Method};
        let origins: Vec<HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    };

    // Add middleware (order matters: first added = outermost)
    let app = app.layer(TraceLayer::new_for_http()).layer(cors_layer);

    // Start server
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🚀 Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("👋 Server shutdown complete");

    Ok(())
}

/// Log configuration warnings and refuse to start on critical production findings
fn run_security_checks(config: &AppConfig) -> anyhow::Result<()> {
    let warnings = SecurityValidator::validate(config);

    for warning in &warnings {
        match warning.severity {
            WarningSeverity::Critical => error!(code = warning.code, "{}", warning),
            WarningSeverity::Warning => warn!(code = warning.code, "{}", warning),
            WarningSeverity::Info => info!(code = warning.code, "{}", warning),
        }
    }

    if SecurityValidator::has_blocking(config, &warnings) {
        anyhow::bail!("Critical configuration issues found in production, refusing to start");
    }
    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM) and handle graceful shutdown
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("⏳ Waiting up to {:?} for connections to close...", timeout);

    // Hard stop if in-flight requests outlive the timeout
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        warn!("Shutdown timeout elapsed, exiting");
        std::process::exit(0);
    });
}
