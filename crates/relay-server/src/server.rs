//! WebSocket listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections (upgraded to WebSocket per-connection).
//! - Assigns each connection a fresh `PeerId`.
//! - Spawns:
//!   - a per-peer task running the connection's pump pair,
//!   - a single central router task that owns the `SignalingRouter`.
//!
//! The per-peer logic and the router loop live in the `peer` and
//! `router_task` modules respectively.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use relay_core::PeerId;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::peer;
use crate::registry::PeerRegistry;
use crate::router_task;
use crate::types::{RouterCommand, RouterRx, RouterTx, OUTBOUND_QUEUE_CAPACITY};

/// A bound, not yet running, relay server.
pub struct RelayServer {
    listener: TcpListener,
    config: Config,
}

impl RelayServer {
    /// Bind the listener for the configured address.
    pub async fn bind(config: Config) -> Result<Self> {
        let addr = config.socket_addr_string();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        Ok(RelayServer { listener, config })
    }

    /// Address actually bound. Useful when the configured port was 0.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept and serve connections until the listener fails.
    pub async fn run(self) -> Result<()> {
        let RelayServer { listener, config } = self;

        info!(
            addr = %listener.local_addr().map(|a| a.to_string()).unwrap_or_default(),
            max_peers = config.max_peers,
            "listening"
        );

        // Shared registry of peers → outbound queues.
        let registry = PeerRegistry::new();

        // Channel from peer read pumps → router task.
        let (router_tx, router_rx): (RouterTx, RouterRx) = mpsc::unbounded_channel();

        // Spawn the central router task.
        {
            let registry = registry.clone();
            tokio::spawn(async move {
                router_task::run_router_loop(router_rx, registry).await;
            });
        }

        loop {
            let (stream, peer_addr) = listener.accept().await?;

            if registry.len().await >= config.max_peers {
                warn!(
                    %peer_addr,
                    max_peers = config.max_peers,
                    "rejecting connection: peer limit reached"
                );
                // Just drop the stream; the client sees the connection close.
                continue;
            }

            let peer_id = PeerId::new(Uuid::new_v4().to_string());

            // Outbound queue for this peer.
            let (out_tx, out_rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);

            // Register before the pumps start; collision means the id
            // generator misbehaved, and the new connection is rejected.
            if !registry.register(peer_id.clone(), out_tx).await {
                warn!(peer = %peer_id, %peer_addr, "rejecting connection: peer id collision");
                continue;
            }
            let _ = router_tx.send(RouterCommand::Attach(peer_id.clone()));

            info!(peer = %peer_id, %peer_addr, "accepted connection");

            // Clone handles to move into the peer task.
            let registry = registry.clone();
            let router_tx = router_tx.clone();

            tokio::spawn(async move {
                match peer::run_peer(peer_id.clone(), stream, router_tx, out_rx, registry).await {
                    Ok(()) => info!(peer = %peer_id, "peer disconnected"),
                    Err(e) => warn!(peer = %peer_id, error = %e, "peer connection ended with error"),
                }
            });
        }
    }
}
