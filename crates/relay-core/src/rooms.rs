//! Room directory: named groupings of peers.
//!
//! A room exists while it has at least one member; the entry is dropped
//! when the last member leaves. A peer is a member of at most one room
//! at a time — joining removes any prior membership first.

use std::collections::HashMap;

use crate::peer::PeerId;

/// Mapping from room name to the ordered list of member peers, with a
/// reverse index from peer to room name so removal never scans every
/// room.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: HashMap<String, Vec<PeerId>>,
    membership: HashMap<PeerId, String>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current members of `room`, in join order. Empty if the room does
    /// not exist.
    pub fn members(&self, room: &str) -> &[PeerId] {
        self.rooms.get(room).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Room the peer is currently a member of, if any.
    pub fn room_of(&self, peer: &PeerId) -> Option<&str> {
        self.membership.get(peer).map(String::as_str)
    }

    /// Append `peer` to `room`, removing it from any prior room first.
    ///
    /// Returns the name of the room the peer left, if it was already a
    /// member somewhere (including `room` itself on a re-join).
    pub fn join(&mut self, room: &str, peer: PeerId) -> Option<String> {
        let left = self.remove(&peer);
        self.rooms
            .entry(room.to_string())
            .or_default()
            .push(peer.clone());
        self.membership.insert(peer, room.to_string());
        left
    }

    /// Remove `peer` from whatever room it is in, dropping the room
    /// entry if it becomes empty. Returns the room the peer left.
    pub fn remove(&mut self, peer: &PeerId) -> Option<String> {
        let room = self.membership.remove(peer)?;
        if let Some(members) = self.rooms.get_mut(&room) {
            members.retain(|m| m != peer);
            if members.is_empty() {
                self.rooms.remove(&room);
            }
        }
        Some(room)
    }

    /// Number of rooms that currently have at least one member.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
