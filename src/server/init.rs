//! Engine construction and the HTTP server run loop

use super::config::{AppConfig, MockMode, ProviderConfig, StorageBackend};
use super::loader::load_config;
use super::validation::validate_config;
use anyhow::{Context, Result};
use axum::{Extension, Router};
use floorgate_core::{Engine, StaticRuleBook};
use floorgate_llm::{FixtureProvider, LayoutProvider, MockProvider, StripFallbackGenerator};
use floorgate_replay::{AuditStore, MemoryAuditStore, SqliteAuditStore};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Open the configured audit store
async fn open_store(config: &AppConfig) -> Result<Arc<dyn AuditStore>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory audit store; nothing survives a restart");
            Ok(Arc::new(MemoryAuditStore::new()))
        }
        StorageBackend::Sqlite => {
            let path = config.storage.db_path();
            let store = SqliteAuditStore::from_path(&path)
                .await
                .with_context(|| format!("Failed to open audit store at {}", path.display()))?;
            Ok(Arc::new(store))
        }
    }
}

fn build_provider(config: &ProviderConfig) -> Arc<dyn LayoutProvider> {
    match config {
        ProviderConfig::Fixture { name, path } => Arc::new(FixtureProvider::new(name, path)),
        ProviderConfig::Mock { name, mode } => match mode {
            MockMode::Fail => Arc::new(MockProvider::failing(name)),
            MockMode::Hang => Arc::new(MockProvider::hanging(name)),
        },
    }
}

/// Build the engine over an already opened store and restore its queue
async fn build_engine_with_store(
    config: &AppConfig,
    store: Arc<dyn AuditStore>,
) -> Result<Arc<Engine>> {
    let rules = Arc::new(StaticRuleBook::new(config.rule_sets.iter().cloned()));
    info!(regions = ?rules.regions(), "Rule sets loaded");

    let engine = config.providers.iter().fold(
        Engine::new(
            &config.engine(),
            Arc::new(StripFallbackGenerator::new()),
            rules,
            store,
        ),
        |engine, provider| engine.with_provider(build_provider(provider)),
    );
    if config.providers.is_empty() {
        warn!("No providers configured; every request will use the fallback generator");
    }

    let restored = engine
        .restore()
        .await
        .context("Failed to restore review queue")?;
    info!(
        providers = ?engine.provider_names(),
        store = engine.store_name(),
        restored,
        "Engine initialized"
    );
    Ok(Arc::new(engine))
}

/// Build the engine described by `config`
pub async fn build_engine(config: &AppConfig) -> Result<Arc<Engine>> {
    validate_config(config)?;
    let store = open_store(config).await?;
    build_engine_with_store(config, store).await
}

/// Application router with middleware
pub fn app(engine: Arc<Engine>) -> Router {
    Router::new()
        .merge(crate::api::health_routes())
        .merge(crate::api::api_router())
        .layer(Extension(engine))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Run the server
pub async fn run(config_path: Option<&Path>) -> Result<()> {
    info!("Starting Floorgate v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(config_path).context("Failed to load configuration")?;
    info!("Configuration loaded");

    let engine = build_engine(&config).await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Floorgate shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
