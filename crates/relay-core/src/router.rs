//! Central signaling router.
//!
//! The router owns the set of registered peers and the room directory,
//! and turns each inbound [`ClientEvent`] into zero or more
//! [`Delivery`]s. It performs no I/O: the caller puts the returned
//! envelopes on each target's outbound queue.
//!
//! The router is built for single ownership — one task drives it,
//! serializing all mutations (registrations, joins, forwards).

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::messages::{Answer, ClientEvent, Delivery, IceCandidate, Join, Offer, ServerEvent};
use crate::peer::PeerId;
use crate::rooms::RoomDirectory;

#[derive(Debug, Default)]
pub struct SignalingRouter {
    peers: HashSet<PeerId>,
    rooms: RoomDirectory,
}

impl SignalingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `peer` a valid forwarding target. Must be called once per
    /// connection, before any of that connection's events are handled.
    pub fn register_peer(&mut self, peer: PeerId) {
        self.peers.insert(peer);
    }

    /// Forget `peer`: it stops being a forwarding target and leaves its
    /// room, if any.
    pub fn unregister_peer(&mut self, peer: &PeerId) {
        self.peers.remove(peer);
        if let Some(room) = self.rooms.remove(peer) {
            debug!(peer = %peer, room = %room, "peer left room");
        }
    }

    /// Whether `peer` is currently registered.
    pub fn is_registered(&self, peer: &PeerId) -> bool {
        self.peers.contains(peer)
    }

    /// Number of currently registered peers.
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Read-only view of the room directory.
    pub fn rooms(&self) -> &RoomDirectory {
        &self.rooms
    }

    /// Process one event from `sender` and return the envelopes to
    /// deliver, in delivery order.
    pub fn handle_event(&mut self, sender: &PeerId, event: ClientEvent) -> Vec<Delivery> {
        match event {
            ClientEvent::Join(join) => self.handle_join(sender, join),
            ClientEvent::IceCandidate(ice) => {
                let IceCandidate {
                    target,
                    label,
                    candidate,
                } = ice;
                self.forward(sender, target, |from| {
                    ServerEvent::ice_candidate(label, candidate, from)
                })
            }
            ClientEvent::Offer(offer) => {
                let Offer { target, sdp } = offer;
                self.forward(sender, target, |from| ServerEvent::offer(sdp, from))
            }
            ClientEvent::Answer(answer) => {
                let Answer { target, sdp } = answer;
                self.forward(sender, target, |from| ServerEvent::answer(sdp, from))
            }
        }
    }

    fn handle_join(&mut self, sender: &PeerId, join: Join) -> Vec<Delivery> {
        let Join { room } = join;

        // A peer is in at most one room: any prior membership (including
        // an earlier join of this same room) ends here.
        if let Some(prior) = self.rooms.remove(sender) {
            debug!(peer = %sender, from = %prior, to = %room, "peer moved rooms");
        }

        let existing: Vec<PeerId> = self.rooms.members(&room).to_vec();

        // Existing members hear about the joiner before the joiner gets
        // its member list.
        let mut out = Vec::with_capacity(existing.len() + 1);
        for member in &existing {
            out.push(Delivery::to(
                member.clone(),
                ServerEvent::new_peer(sender.clone()),
            ));
        }

        self.rooms.join(&room, sender.clone());
        debug!(peer = %sender, room = %room, members = existing.len() + 1, "peer joined room");

        out.push(Delivery::to(
            sender.clone(),
            ServerEvent::peers(existing, sender.clone()),
        ));
        out
    }

    fn forward(
        &mut self,
        sender: &PeerId,
        target: PeerId,
        build: impl FnOnce(PeerId) -> ServerEvent,
    ) -> Vec<Delivery> {
        if !self.peers.contains(&target) {
            // Normal outcome: the target may have disconnected. The
            // sender gets no feedback.
            warn!(sender = %sender, target = %target, "dropping forward to unknown peer");
            return Vec::new();
        }
        vec![Delivery::to(target, build(sender.clone()))]
    }
}
