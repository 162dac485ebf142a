//! Savings tracker - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Initialize logging
//! 2. Load configuration from environment variables
//! 3. Pick the ledger store: PostgreSQL (pool + migrations) when
//!    `DATABASE_URL` is set, in-memory otherwise
//! 4. Seed the three accounts
//! 5. Build the HTTP router and serve until Ctrl-C

use std::sync::Arc;

use savings_tracker::{
    config, db,
    ledger::{LedgerStore, MemoryLedgerStore, PgLedgerStore},
    routes,
    services::{account_service::AccountService, clock::SystemClock},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    let store: Arc<dyn LedgerStore> = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url, config.database_max_connections).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            Arc::new(PgLedgerStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory ledger; data is lost on restart");
            Arc::new(MemoryLedgerStore::new())
        }
    };

    let service = AccountService::new(store, Arc::new(SystemClock));
    service.ensure_seeded().await?;

    let app = routes::router(service).layer(routes::cors_layer(config.allowed_origin.as_deref())?);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
}
