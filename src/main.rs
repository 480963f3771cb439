use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use aether::config::{Config, StoreBackend};
use aether::database::Database;
use aether::runtime;
use aether::store::{OWNER_SCOPED_COLLECTIONS, StoreHolder};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // stdout carries the event stream, so logs go to stderr
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("aether=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Aether gateway cache...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");
    info!("Store backend: {:?}, shards: {}", config.store_backend, config.shard_count);

    let stores = match config.store_backend {
        StoreBackend::Memory => StoreHolder::in_memory(),
        StoreBackend::Mongo => {
            // from_env guarantees the URI for the mongo backend
            let uri = config.mongodb_uri.as_deref().unwrap_or_default();

            info!("Connecting to MongoDB...");
            let db = Database::connect(uri, &config.mongodb_database).await?;
            info!("Database connected");

            for collection in OWNER_SCOPED_COLLECTIONS {
                db.ensure_owner_index(collection).await?;
            }

            StoreHolder::mongo(&db, config.cache().as_ref())
        }
    };

    let stats = runtime::run(config.shard_count, Arc::new(stores)).await?;
    info!(
        "Processed {} lines into {} events ({} skipped)",
        stats.lines, stats.events, stats.skipped
    );

    Ok(())
}
