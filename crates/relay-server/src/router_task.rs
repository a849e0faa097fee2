//! Central router loop.
//!
//! This task owns the `SignalingRouter` and processes all
//! `RouterCommand`s coming from peer read pumps. Running every mutation
//! on one task serializes access to the peer set and room directory, and
//! preserves the join ordering contract: every envelope produced by one
//! event is enqueued before the next event is looked at.

use relay_core::{Delivery, SignalingRouter};
use relay_protocol::encode_server;
use tokio::sync::mpsc::error::TrySendError;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::registry::PeerRegistry;
use crate::types::{RouterCommand, RouterRx};

/// Run the central routing loop.
///
/// - `router_rx`: receives commands from all peer tasks.
/// - `registry`: registry of connected peers and their outbound queues.
pub(crate) async fn run_router_loop(mut router_rx: RouterRx, registry: PeerRegistry) {
    let mut router = SignalingRouter::new();

    while let Some(cmd) = router_rx.recv().await {
        match cmd {
            RouterCommand::Attach(peer) => router.register_peer(peer),
            RouterCommand::Detach(peer) => router.unregister_peer(&peer),
            RouterCommand::Event { peer, event } => {
                for delivery in router.handle_event(&peer, event) {
                    deliver(&registry, delivery).await;
                }
            }
        }
    }

    info!("router loop shutting down (router_rx closed)");
}

/// Serialize one routed event and enqueue it on the target's outbound
/// queue. Every failure mode is local to the target peer.
async fn deliver(registry: &PeerRegistry, delivery: Delivery) {
    let Delivery { target, event } = delivery;

    let Some(tx) = registry.lookup(&target).await else {
        debug!(peer = %target, "delivery target already disconnected");
        return;
    };

    let text = match encode_server(&event) {
        Ok(text) => text,
        Err(e) => {
            error!(peer = %target, error = %e, "failed to encode outbound envelope");
            return;
        }
    };

    match tx.try_send(Message::Text(text)) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            warn!(peer = %target, "outbound queue full, dropping envelope");
        }
        Err(TrySendError::Closed(_)) => {
            debug!(peer = %target, "outbound queue closed, peer going away");
        }
    }
}
