//! WebSocket signaling relay binary.

use anyhow::Result;
use relay_server::config::Config;
use relay_server::server::RelayServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    RelayServer::bind(config).await?.run().await
}
