use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use server::config::{AppConfig, StorageBackend};
use server::database::{ensure_indexes, init_db};
use server::state::AppState;
use server::store::{DatasetStore, MemoryDatasetStore, SeaOrmDatasetStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let store: Arc<dyn DatasetStore> = match config.storage.backend {
        StorageBackend::Postgres => {
            let db = init_db(&config.database)
                .await
                .context("Failed to initialize database")?;
            ensure_indexes(&db).await;
            Arc::new(SeaOrmDatasetStore::new(db))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; datasets are lost on restart");
            Arc::new(MemoryDatasetStore::new())
        }
    };

    info!(
        backend = ?config.storage.backend,
        retention_limit = config.retention.limit,
        detail_limit = config.report.detail_limit,
        "Storage ready"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = server::build_router(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
