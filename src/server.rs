//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, click worker and rate limiter lifecycles,
//! and the Axum server with graceful shutdown.

use crate::application::services::RateLimiter;
use crate::config::Config;
use crate::domain::click_queue::click_queue;
use crate::domain::click_worker::ClickWorkerPool;
use crate::infrastructure::persistence::{PgClickRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Click queue and worker pool
/// - Rate limiter with its idle-bucket sweep
/// - Axum HTTP server
///
/// On Ctrl-C or SIGTERM the server stops accepting connections, then the
/// click workers and the sweep are stopped before the pool is closed.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Rate limiter settings are invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let pool = Arc::new(pool);

    let click_repository = Arc::new(PgClickRepository::new(pool.clone()));

    let (click_ingestor, click_queue) = click_queue(config.click_queue_capacity);
    let click_workers = Arc::new(ClickWorkerPool::new(
        click_queue,
        click_repository.clone(),
        config.worker_settings(),
    ));
    click_workers.start();

    let rate_limiter = Arc::new(
        RateLimiter::new(config.rate_limiter_config()).context("Invalid rate limiter settings")?,
    );
    let cleanup = rate_limiter.spawn_cleanup();

    let state = AppState::new(
        Arc::new(PgLinkRepository::new(pool.clone())),
        click_repository,
        click_ingestor,
        click_workers.clone(),
        rate_limiter,
        config.behind_proxy,
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    click_workers.stop().await;
    cleanup.stop().await;
    pool.close().await;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}
