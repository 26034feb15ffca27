use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::app::{app, AppState};
use crate::auth::TokenVerifier;
use crate::config::AppConfig;
use crate::database::{AnalyticsStore, DatabaseManager, MemoryStore, PgStore, QuerySettings};

#[derive(Args, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides APP_PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Serve from a JSON fixture instead of PostgreSQL")]
    pub fixtures: Option<PathBuf>,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting analytics API in {:?} mode", config.environment);

    let verifier = TokenVerifier::new(&config.security.jwt_secret)
        .context("failed to initialise token verifier")?;

    let mut pool = None;
    let store: Arc<dyn AnalyticsStore> = match &args.fixtures {
        Some(path) => {
            tracing::info!("Serving from fixture {}", path.display());
            Arc::new(MemoryStore::from_fixture_file(path)?)
        }
        None => {
            let pg = DatabaseManager::connect(&config)?;
            pool = Some(pg.clone());
            Arc::new(PgStore::new(pg, QuerySettings::from(&config.database)))
        }
    };

    let router = app(AppState::new(store, verifier), &config);

    let port = args.port.unwrap_or(config.api.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Analytics API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pool) = pool {
        DatabaseManager::close(&pool).await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
