//! HTTP server bootstrap and runtime wiring.
//!
//! Startup order is fixed: configuration, then schema, then the listener. A
//! failure before the listener is bound ends the process without serving.

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use formbook_infra::{DbConfig, EntryStore, PostgresEntryStore};

use crate::app;

/// The service always listens here.
pub const LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Serve the app on an already bound listener until `shutdown` resolves.
///
/// In-flight requests are drained before this returns.
pub async fn serve<F>(
    listener: TcpListener,
    store: Arc<dyn EntryStore>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app::build_app(store))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Full process lifecycle: bootstrap the database, bind, serve until a
/// shutdown signal, close the pool.
pub async fn run(config: DbConfig) -> anyhow::Result<()> {
    let store = PostgresEntryStore::bootstrap(&config)
        .await
        .context("failed to initialize database schema")?;

    let listener = TcpListener::bind(LISTEN_ADDR)
        .await
        .with_context(|| format!("failed to bind {LISTEN_ADDR}"))?;
    tracing::info!("Server running on {}", listener.local_addr()?);

    serve(listener, Arc::new(store.clone()), shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
