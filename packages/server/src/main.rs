use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use common::storage::FileStore;
use common::storage::filesystem::FilesystemFileStore;
use mq::{JobQueue, MqConfig, init_mq};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use inventory_server::config::AppConfig;
use inventory_server::database::init_db;
use inventory_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    info!("Database ready");

    let files: Arc<dyn FileStore> = Arc::new(
        FilesystemFileStore::new(config.storage.root.clone(), config.storage.max_file_size)
            .await
            .context("Failed to initialize file storage")?,
    );
    info!(root = %config.storage.root.display(), "File storage ready");

    let queue: Option<Arc<dyn JobQueue>> = if config.mq.enabled {
        let mq = init_mq(MqConfig {
            url: config.mq.url.clone(),
            pool_size: config.mq.pool_size,
        })
        .await
        .context("Failed to connect to message queue")?;
        info!(queue = %config.mq.queue_name, "Message queue connected");
        let queue: Arc<dyn JobQueue> = Arc::new(mq);
        Some(queue)
    } else {
        warn!("Message queue disabled, uploads will not send notifications");
        None
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        db,
        config,
        files,
        queue,
    };
    let app = inventory_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
