//! Wire-level constants and the JSON envelope.
//!
//! Every message, in both directions, is a single JSON object:
//!
//! ```text
//! {"eventName": <string>, "data": {<string>: <value>, ...}}
//! ```
//!
//! Event names consumed from peers:
//!
//! - `__join`          : `{room}`
//! - `__ice_candidate` : `{socketId, label, candidate}`
//! - `__offer`         : `{socketId, sdp}`
//! - `__answer`        : `{socketId, sdp}`
//!
//! Event names produced for peers:
//!
//! - `_peers`          : `{connections, you}`
//! - `_new_peer`       : `{socketId}`
//! - `_ice_candidate`  : `{label, candidate, socketId}`
//! - `_offer`          : `{sdp, socketId}`
//! - `_answer`         : `{sdp, socketId}`
//!
//! In inbound events `socketId` names the forwarding **target**; in
//! outbound events it is always the original **sender's** id, rewritten
//! by the relay.
//!
//! The actual encode/decode logic lives in `json_codec`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inbound event names (peer → relay).
pub const EVENT_JOIN: &str = "__join";
pub const EVENT_ICE_CANDIDATE: &str = "__ice_candidate";
pub const EVENT_OFFER: &str = "__offer";
pub const EVENT_ANSWER: &str = "__answer";

/// Outbound event names (relay → peer).
pub const EVENT_PEERS: &str = "_peers";
pub const EVENT_NEW_PEER: &str = "_new_peer";
pub const EVENT_RELAYED_ICE_CANDIDATE: &str = "_ice_candidate";
pub const EVENT_RELAYED_OFFER: &str = "_offer";
pub const EVENT_RELAYED_ANSWER: &str = "_answer";

/// Payload field naming the forwarding target (inbound) or the original
/// sender (outbound).
pub const FIELD_SOCKET_ID: &str = "socketId";

/// The JSON message wrapper used identically in both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "eventName")]
    pub event_name: String,

    #[serde(default)]
    pub data: Map<String, Value>,
}
