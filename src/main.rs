use anyhow::Context;
use std::process::ExitCode;

use todo_api_rust::config::AppConfig;
use todo_api_rust::database::DatabaseManager;
use todo_api_rust::{app, logging, AppState};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_PRIVATE_KEY, etc.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env();
    logging::init(&config.logging);

    if let Err(e) = config.validate() {
        tracing::error!("FATAL ERROR: {}", e);
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting To-do API in {:?} mode", config.environment);

    let url = config.database.url.clone().unwrap_or_default();
    let store = DatabaseManager::connect(&url, &config.database)
        .await
        .context("connecting to the database")?;

    let bind_addr = config.bind_addr();
    let state = AppState::new(config, store.clone()).context("building application state")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running server")?;

    store.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to install Ctrl+C handler: {}", e);
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
                tracing::warn!("failed to install SIGTERM handler: {}", e);
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
