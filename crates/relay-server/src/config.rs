//! Configuration for the relay WebSocket server.
//!
//! For now this is intentionally simple: you can either use defaults
//! or override via a few environment variables:
//!
//! - `RELAY_BIND_ADDR` (default: "0.0.0.0")
//! - `RELAY_PORT`      (default: "8080")
//! - `RELAY_MAX_PEERS` (default: "1024")

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on. Port 0 binds an ephemeral port.
    pub port: u16,

    /// Maximum number of simultaneously connected peers.
    pub max_peers: usize,
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to reasonable defaults.
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("RELAY_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = read_env_or_default("RELAY_PORT", 8080u16)?;
        let max_peers = read_env_or_default("RELAY_MAX_PEERS", 1024usize)?;

        Ok(Config {
            bind_addr,
            port,
            max_peers,
        })
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn read_env_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .with_context(|| format!("parsing environment variable {key}")),
        Err(_) => Ok(default),
    }
}
