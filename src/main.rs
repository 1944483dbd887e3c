// ABOUTME: Main entry point for the OIA website API server
// ABOUTME: Loads configuration, connects storage, seeds first-run data and serves HTTP

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;

use oia_backend::config::{self, Config};
use oia_backend::seed;
use oia_backend::storage::Storage;
use oia_backend::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = config::load_env_file();
    let config = Config::parse();
    config::init_tracing(&config.log_level);

    if let Some(path) = env_file {
        tracing::debug!("Loaded environment from {}", path.display());
    }
    config.validate()?;

    if config.uses_default_secret() {
        tracing::warn!("JWT_SECRET_KEY is not set; using the built-in development secret");
    }

    let store = config.store.connect().await?;
    let storage = Arc::new(Storage::new(store));
    storage
        .ping()
        .await
        .context("Database ping failed. Check MONGO_URL; is MongoDB running?")?;
    storage.ensure_indexes().await?;

    if config.no_seed {
        tracing::info!("Skipping sample data");
    } else {
        match seed::seed_database(
            &storage,
            &config.seed_admin_username,
            &config.seed_admin_password,
        )
        .await
        {
            Ok(report) => tracing::info!(
                "Seeding finished (admin created: {}, collections filled: {})",
                report.admin_created,
                report.inserted.len()
            ),
            Err(e) => tracing::error!("Seeding failed: {}", e),
        }
    }

    let state = AppState::new(storage.clone(), config.clone());
    state
        .uploads
        .ensure_dirs()
        .await
        .with_context(|| format!("Cannot create upload directory {}", config.upload_dir.display()))?;

    let app = build_router(state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await.with_context(|| {
        format!(
            "Cannot bind to {}. Port {} may already be in use; try --port 8001",
            address, config.port
        )
    })?;
    tracing::info!("🚀 OIA Website API listening on http://{}", address);
    tracing::info!("Route catalogue at http://{}/docs", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storage.close().await;
    tracing::info!("Database connection closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down");
}
