//! Registry of connected peers and their outbound queues.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use relay_core::PeerId;
use tokio::sync::RwLock;

use crate::types::OutboundTx;

/// Shared map from peer id to that peer's outbound queue handle.
///
/// Lookup is a hash lookup; "not found" is a normal outcome the caller
/// must handle (the peer may have disconnected between routing and
/// delivery).
#[derive(Debug, Clone, Default)]
pub struct PeerRegistry {
    inner: Arc<RwLock<HashMap<PeerId, OutboundTx>>>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a peer keyed by its id.
    ///
    /// Returns `false` (leaving the registry unchanged) if the id is
    /// already taken; the caller should drop the new connection.
    pub async fn register(&self, peer: PeerId, tx: OutboundTx) -> bool {
        let mut guard = self.inner.write().await;
        match guard.entry(peer) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(tx);
                true
            }
        }
    }

    /// Queue handle for `peer`, if it is still connected.
    pub async fn lookup(&self, peer: &PeerId) -> Option<OutboundTx> {
        self.inner.read().await.get(peer).cloned()
    }

    /// Remove a peer on teardown. Dropping the stored sender is what
    /// lets the peer's write pump observe a closed queue and exit.
    pub async fn unregister(&self, peer: &PeerId) {
        self.inner.write().await.remove(peer);
    }

    /// Number of currently registered peers.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
