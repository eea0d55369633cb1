//! Order Cache - order lookup service with a cache-aside layer
//!
//! Reads newline-delimited order JSON from stdin, persists each order and
//! serves lookups over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use order_cache::api::{create_router, AppState};
use order_cache::ingest::spawn_line_reader;
use order_cache::{Config, Context, JsonFileRepository, OrderConsumer, OrderService};

/// Ingestion channel depth; the stdin reader waits when it is full.
const INGEST_BUFFER: usize = 64;

/// Main entry point for the order service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the order store and build the service
/// 4. Restore the cache; a failure aborts startup
/// 5. Start stdin ingestion
/// 6. Serve HTTP until SIGINT/SIGTERM, then stop ingestion and close the cache
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting order cache service");

    let config = Config::from_env();
    info!(
        max_entries = config.max_entries,
        startup_size = config.startup_size,
        cache_ttl = config.cache_ttl,
        port = config.server_port,
        orders_file = %config.orders_file.display(),
        "Configuration loaded"
    );

    let repo = JsonFileRepository::open(&config.orders_file)
        .await
        .with_context(|| format!("opening {}", config.orders_file.display()))?;
    let service = Arc::new(OrderService::from_config(Arc::new(repo), &config));

    let (root, cancel) = Context::with_cancel();

    service
        .restore_cache(&root.child_with_timeout(config.request_timeout()))
        .await
        .context("restoring order cache")?;

    // Ingestion
    let (tx, rx) = mpsc::channel(INGEST_BUFFER);
    let reader = spawn_line_reader(tokio::io::stdin(), tx);
    let consumer = OrderConsumer::new(service.clone(), rx, config.request_timeout());
    let consumer = tokio::spawn(consumer.run(root.clone()));

    // HTTP
    let state = AppState::with_root(service.clone(), root, config.request_timeout());
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    cancel.cancel();
    reader.abort();
    match consumer.await {
        Ok(stats) => info!(saved = stats.saved, failed = stats.failed, "Ingestion stopped"),
        Err(err) => warn!(error = %err, "Ingestion task ended abnormally"),
    }

    service.close();
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
