//! Shared types for the relay WebSocket server.
//!
//! This module defines:
//! - channel aliases between peer tasks and the router loop
//! - [`RouterCommand`]: messages flowing from peer tasks to the router

use relay_core::{ClientEvent, PeerId};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

/// Capacity of each peer's outbound queue, in serialized envelopes.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Outbound frames from the router to a given peer.
///
/// Bounded: the router drops (with a warning) rather than blocks when a
/// peer's write pump cannot keep up.
pub type OutboundTx = mpsc::Sender<Message>;
pub type OutboundRx = mpsc::Receiver<Message>;

/// Message flowing from a peer task into the central router task.
#[derive(Debug)]
pub enum RouterCommand {
    /// A new peer connected and is routable.
    Attach(PeerId),

    /// A peer sent a signaling event.
    Event { peer: PeerId, event: ClientEvent },

    /// A peer's connection is gone; forget it.
    Detach(PeerId),
}

/// Channel from peer tasks → router task.
pub type RouterTx = mpsc::UnboundedSender<RouterCommand>;
pub type RouterRx = mpsc::UnboundedReceiver<RouterCommand>;
