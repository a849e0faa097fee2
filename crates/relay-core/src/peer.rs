//! Peer identifiers.

use std::fmt;

/// Identifier for a connected peer.
///
/// This is intentionally opaque; the server assigns one globally unique
/// string per connection, and it never changes for the lifetime of that
/// connection. Peers address each other with these ids in forwarded
/// signaling payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        PeerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
