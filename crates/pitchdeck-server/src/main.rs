//! PR Pitch Deck server entry point.
//!
//! Loads the required secrets (refusing to start without them), builds the
//! Gemini client and shared state, then starts the Axum HTTP server with
//! graceful shutdown. A background worker drops idle sessions and is
//! cancelled on shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

use pitchdeck_core::config::AppConfig;
use pitchdeck_core::generation::GeminiClient;

use pitchdeck_server::config::ServerConfig;
use pitchdeck_server::routes;
use pitchdeck_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment.
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    // Nothing is served until all three secrets are present.
    let app_config = AppConfig::from_env().map_err(|errs| {
        for err in errs.errors() {
            error!(key = err.key(), error = %err, "required configuration missing");
        }
        errs
    })?;

    let generator = GeminiClient::new(
        app_config.google_api_key.clone(),
        &config.api_base,
        &config.model,
    )
    .context("failed to build generation client")?;

    info!(
        model = generator.model(),
        endpoint = generator.endpoint(),
        secure_cookies = config.secure_cookies,
        "PR Pitch Deck starting"
    );

    let state = Arc::new(
        AppState::new(app_config, Arc::new(generator)).with_secure_cookies(config.secure_cookies),
    );

    // Shutdown signal channel.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Spawn idle-session sweeper.
    let sweeper_handle = {
        let state = Arc::clone(&state);
        let mut rx = shutdown_rx.clone();
        let max_idle = config.session_idle;
        tokio::spawn(async move {
            session_sweeper(state, &mut rx, max_idle).await;
        })
    };

    let app = routes::build_router(Arc::clone(&state));

    // Bind and serve.
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "PR Pitch Deck listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("server error")?;

    info!("waiting for background workers to stop");
    let _ = tokio::time::timeout(Duration::from_secs(10), sweeper_handle).await;

    info!("PR Pitch Deck stopped");
    Ok(())
}

/// Periodically drops sessions that have been idle longer than `max_idle`.
///
/// Scans at a tenth of the idle window, but at least once a minute.
async fn session_sweeper(
    state: Arc<AppState>,
    shutdown: &mut watch::Receiver<bool>,
    max_idle: Duration,
) {
    let period = (max_idle / 10).clamp(Duration::from_secs(1), Duration::from_secs(60));
    let mut interval = tokio::time::interval(period);
    info!(max_idle_secs = max_idle.as_secs(), "session sweeper started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let removed = state.sessions.sweep(max_idle).await;
                if removed > 0 {
                    let remaining = state.sessions.count().await;
                    info!(removed, remaining, "idle sessions dropped");
                }
            }
            _ = shutdown.changed() => {
                info!("session sweeper shutting down");
                return;
            }
        }
    }
}

/// Wait for SIGINT or SIGTERM, then broadcast shutdown.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
    let _ = shutdown_tx.send(true);
}
