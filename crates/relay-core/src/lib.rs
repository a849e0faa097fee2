//! relay-core
//!
//! Pure signaling relay logic:
//! - peer identifiers
//! - messages (client/server event types)
//! - room directory
//! - signaling router

pub mod messages;
pub mod peer;
pub mod rooms;
pub mod router;

pub use peer::PeerId;

pub use messages::{
    Answer,
    ClientEvent,
    Delivery,
    IceCandidate,
    Join,
    NewPeer,
    Offer,
    Peers,
    RelayedAnswer,
    RelayedIceCandidate,
    RelayedOffer,
    ServerEvent,
};

pub use rooms::RoomDirectory;
pub use router::SignalingRouter;
