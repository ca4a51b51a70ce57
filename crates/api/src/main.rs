use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spotwatch_api::background;
use spotwatch_api::config::ServerConfig;
use spotwatch_api::router::build_app_router;
use spotwatch_api::state::AppState;
use spotwatch_events::SubscriptionHub;
use spotwatch_store::MemoryStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spotwatch_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Document store ---
    let store = Arc::new(MemoryStore::new());
    tracing::info!("Document store initialized");

    // --- Subscription hub ---
    let hub = Arc::new(SubscriptionHub::new(config.ws_send_buffer));
    tracing::info!(buffer = config.ws_send_buffer, "Subscription hub created");

    // --- Rating retry worker ---
    let (rating_retry, retry_rx) = background::RatingRetryQueue::new();
    let retry_cancel = tokio_util::sync::CancellationToken::new();
    let retry_handle = background::spawn_rating_retry_worker(
        Arc::clone(&store),
        rating_retry.clone(),
        retry_rx,
        retry_cancel.clone(),
        config.rating_retry_interval_secs,
    );
    tracing::info!("Rating retry worker started");

    // --- App state ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        hub: Arc::clone(&hub),
        rating_retry,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Stop the rating retry worker.
    retry_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), retry_handle).await;
    tracing::info!("Rating retry worker stopped");

    // Close every subscriber channel; forwarding tasks see the closed
    // channel and send their Close frames.
    let client_count = hub.client_count().await;
    tracing::info!(client_count, "Closing remaining subscriber channels");
    hub.shutdown_all().await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
