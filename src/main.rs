//! Server binary: env config, migrations, pool, ping, routes, listen.

use diamond_scheduler::{apply_migrations, app, db, AppConfig, AppState, Cors, DbConn};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("diamond_scheduler=info,tower_http=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(target_db = %config.database_target(), "connecting to database");
    let pool = db::connect(
        config.connect_options(),
        config.db_max_connections,
        CONNECT_TIMEOUT,
    )
    .await?;

    apply_migrations(&pool, &config.migrations_dir).await?;

    tokio::time::timeout(CONNECT_TIMEOUT, pool.query_one("SELECT 1", &[]))
        .await
        .map_err(|_| "database ping timed out")??;
    tracing::info!("database ping succeeded");

    let state = AppState::new(Arc::new(pool.clone()));
    let router = app(state, Cors::new(config.cors_origin.clone()), config.request_timeout);

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("server listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "could not listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not listen for SIGTERM");
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
