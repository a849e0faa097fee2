//! Message types used by the signaling router.
//!
//! These are **transport-agnostic** logical messages:
//! - [`ClientEvent`]: what a peer sends to the relay.
//! - [`ServerEvent`]: what the relay sends to a peer.
//!
//! Payload fields the relay merely forwards (`sdp`, `label`,
//! `candidate`) are opaque [`serde_json::Value`]s; the relay routes them
//! without interpreting their contents.
//!
//! Note: the JSON envelope encoder/decoder lives in the `relay-protocol`
//! crate; this module is purely logical.

use serde_json::Value;

use crate::peer::PeerId;

/// A request from a connected peer into the signaling router.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Join (or move to) a named room.
    Join(Join),

    /// Forward an ICE candidate to another peer.
    IceCandidate(IceCandidate),

    /// Forward a session offer to another peer.
    Offer(Offer),

    /// Forward a session answer to another peer.
    Answer(Answer),
}

/// An event emitted by the signaling router toward one peer.
///
/// Forwarded variants always carry the **original sender's** id so the
/// receiver knows who to reply to, regardless of anything the sender put
/// in its own payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Member list sent to a peer that just joined a room.
    Peers(Peers),

    /// Notification to an existing member that a new peer joined.
    NewPeer(NewPeer),

    /// An ICE candidate forwarded from another peer.
    IceCandidate(RelayedIceCandidate),

    /// A session offer forwarded from another peer.
    Offer(RelayedOffer),

    /// A session answer forwarded from another peer.
    Answer(RelayedAnswer),
}

/// Join request (input).
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Room to join; created implicitly on first join.
    pub room: String,
}

/// ICE candidate forward request (input).
#[derive(Debug, Clone, PartialEq)]
pub struct IceCandidate {
    /// Peer the candidate is addressed to.
    pub target: PeerId,

    /// Media line index, opaque to the relay.
    pub label: Value,

    /// Candidate descriptor, opaque to the relay.
    pub candidate: Value,
}

/// Session offer forward request (input).
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub target: PeerId,

    /// Session description, opaque to the relay.
    pub sdp: Value,
}

/// Session answer forward request (input).
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub target: PeerId,
    pub sdp: Value,
}

/// Room membership snapshot for a joiner (output).
#[derive(Debug, Clone, PartialEq)]
pub struct Peers {
    /// Ids of every member present before the join, in join order.
    /// The joiner initiates an offer to each of them.
    pub connections: Vec<PeerId>,

    /// The joiner's own id.
    pub you: PeerId,
}

/// New-member notification for existing room members (output).
#[derive(Debug, Clone, PartialEq)]
pub struct NewPeer {
    /// Id of the peer that just joined.
    pub peer: PeerId,
}

/// Forwarded ICE candidate (output).
#[derive(Debug, Clone, PartialEq)]
pub struct RelayedIceCandidate {
    pub label: Value,
    pub candidate: Value,

    /// The peer that sent the candidate.
    pub from: PeerId,
}

/// Forwarded session offer (output).
#[derive(Debug, Clone, PartialEq)]
pub struct RelayedOffer {
    pub sdp: Value,
    pub from: PeerId,
}

/// Forwarded session answer (output).
#[derive(Debug, Clone, PartialEq)]
pub struct RelayedAnswer {
    pub sdp: Value,
    pub from: PeerId,
}

/// A routed outbound event: which peer receives which event.
///
/// Deliveries produced by one [`ClientEvent`] are ordered; callers must
/// enqueue them in the order returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub target: PeerId,
    pub event: ServerEvent,
}

impl Delivery {
    pub fn to(target: PeerId, event: ServerEvent) -> Self {
        Delivery { target, event }
    }
}

// -----------------------------------------------------------------------------
// Convenience constructors
// -----------------------------------------------------------------------------

impl ClientEvent {
    /// Convenience constructor for a join request.
    pub fn join(room: impl Into<String>) -> Self {
        ClientEvent::Join(Join { room: room.into() })
    }

    /// Convenience constructor for an ICE candidate forward request.
    pub fn ice_candidate(target: PeerId, label: Value, candidate: Value) -> Self {
        ClientEvent::IceCandidate(IceCandidate {
            target,
            label,
            candidate,
        })
    }

    /// Convenience constructor for an offer forward request.
    pub fn offer(target: PeerId, sdp: Value) -> Self {
        ClientEvent::Offer(Offer { target, sdp })
    }

    /// Convenience constructor for an answer forward request.
    pub fn answer(target: PeerId, sdp: Value) -> Self {
        ClientEvent::Answer(Answer { target, sdp })
    }
}

impl ServerEvent {
    /// Convenience constructor for a membership snapshot.
    pub fn peers(connections: Vec<PeerId>, you: PeerId) -> Self {
        ServerEvent::Peers(Peers { connections, you })
    }

    /// Convenience constructor for a new-member notification.
    pub fn new_peer(peer: PeerId) -> Self {
        ServerEvent::NewPeer(NewPeer { peer })
    }

    /// Convenience constructor for a forwarded ICE candidate.
    pub fn ice_candidate(label: Value, candidate: Value, from: PeerId) -> Self {
        ServerEvent::IceCandidate(RelayedIceCandidate {
            label,
            candidate,
            from,
        })
    }

    /// Convenience constructor for a forwarded offer.
    pub fn offer(sdp: Value, from: PeerId) -> Self {
        ServerEvent::Offer(RelayedOffer { sdp, from })
    }

    /// Convenience constructor for a forwarded answer.
    pub fn answer(sdp: Value, from: PeerId) -> Self {
        ServerEvent::Answer(RelayedAnswer { sdp, from })
    }
}
