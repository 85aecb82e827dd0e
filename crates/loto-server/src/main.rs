//! Lottery intake server binary.
//!
//! # Usage
//!
//! ```bash
//! loto-server --port 12345 --expected-agencies 5 --store-path ./bets.csv
//! ```

use std::sync::Arc;

use clap::Parser;
use loto_server::store::{BetStoreHandle, FileStore, MemoryStore};
use loto_server::{Args, Server, ServerConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("lottery intake server starting");

    let store: BetStoreHandle = match &args.store_path {
        Some(path) => {
            tracing::info!(path, "using file-backed bet store");
            Arc::new(FileStore::open(path).await?)
        }
        None => {
            tracing::info!("using in-memory bet store (not durable across restarts)");
            Arc::new(MemoryStore::new())
        }
    };

    let config = ServerConfig::from(&args);
    let server = Server::bind(config, store).await?;
    tracing::info!(addr = %server.local_addr()?, "listening");

    server.run().await?;

    tracing::info!("server stopped");
    Ok(())
}
