//! JSON encoding/decoding for relay messages.
//!
//! This module converts between:
//! - raw inbound frames (`&[u8]`) and `relay_core::ClientEvent`
//! - `relay_core::ServerEvent` and outbound envelope text
//!
//! Decode failures are classified so the caller can apply the right
//! policy per case:
//! - not JSON at all, or a recognized event with broken routing fields
//!   → [`ProtocolError`], message dropped, connection stays open;
//! - JSON without an `eventName` → [`ProtocolError::MissingEventName`],
//!   logged by the caller as opaque inbound traffic;
//! - well-formed envelope with an out-of-vocabulary event name
//!   → [`Inbound::Ignored`], not an error.

use relay_core::{ClientEvent, PeerId, ServerEvent};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::wire::{
    Envelope, EVENT_ANSWER, EVENT_ICE_CANDIDATE, EVENT_JOIN, EVENT_NEW_PEER, EVENT_OFFER,
    EVENT_PEERS, EVENT_RELAYED_ANSWER, EVENT_RELAYED_ICE_CANDIDATE, EVENT_RELAYED_OFFER,
    FIELD_SOCKET_ID,
};

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame is not valid JSON at all.
    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Valid JSON, but not an object carrying a string `eventName`.
    #[error("envelope has no event name")]
    MissingEventName,

    /// A recognized event is missing a field it cannot be routed without.
    #[error("{event} event missing required field `{field}`")]
    MissingField {
        event: &'static str,
        field: &'static str,
    },

    /// A required field is present but of the wrong type.
    #[error("{event} event field `{field}` has the wrong type")]
    InvalidField {
        event: &'static str,
        field: &'static str,
    },
}

/// A successfully decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// An event the router understands.
    Event(ClientEvent),

    /// A well-formed envelope with an event name outside the vocabulary;
    /// the relay ignores these.
    Ignored { event: String },
}

/// Decode one raw frame from a peer.
pub fn decode_client(bytes: &[u8]) -> Result<Inbound, ProtocolError> {
    let value: Value = serde_json::from_slice(bytes)?;

    if value.get("eventName").and_then(Value::as_str).is_none() {
        return Err(ProtocolError::MissingEventName);
    }

    let Envelope { event_name, data } = serde_json::from_value(value)?;

    let event = match event_name.as_str() {
        EVENT_JOIN => ClientEvent::join(require_str(EVENT_JOIN, "room", &data)?),
        EVENT_ICE_CANDIDATE => ClientEvent::ice_candidate(
            require_target(EVENT_ICE_CANDIDATE, &data)?,
            opaque(&data, "label"),
            opaque(&data, "candidate"),
        ),
        EVENT_OFFER => {
            ClientEvent::offer(require_target(EVENT_OFFER, &data)?, opaque(&data, "sdp"))
        }
        EVENT_ANSWER => {
            ClientEvent::answer(require_target(EVENT_ANSWER, &data)?, opaque(&data, "sdp"))
        }
        _ => return Ok(Inbound::Ignored { event: event_name }),
    };

    Ok(Inbound::Event(event))
}

/// Encode one outbound event as envelope JSON text.
pub fn encode_server(event: &ServerEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&to_envelope(event))
}

/// Build the wire envelope for an outbound event.
pub fn to_envelope(event: &ServerEvent) -> Envelope {
    let mut data = Map::new();
    let name = match event {
        ServerEvent::Peers(p) => {
            let connections = p
                .connections
                .iter()
                .map(|id| Value::String(id.as_str().to_string()))
                .collect();
            data.insert("connections".to_string(), Value::Array(connections));
            data.insert("you".to_string(), peer_value(&p.you));
            EVENT_PEERS
        }
        ServerEvent::NewPeer(n) => {
            data.insert(FIELD_SOCKET_ID.to_string(), peer_value(&n.peer));
            EVENT_NEW_PEER
        }
        ServerEvent::IceCandidate(f) => {
            data.insert("label".to_string(), f.label.clone());
            data.insert("candidate".to_string(), f.candidate.clone());
            data.insert(FIELD_SOCKET_ID.to_string(), peer_value(&f.from));
            EVENT_RELAYED_ICE_CANDIDATE
        }
        ServerEvent::Offer(f) => {
            data.insert("sdp".to_string(), f.sdp.clone());
            data.insert(FIELD_SOCKET_ID.to_string(), peer_value(&f.from));
            EVENT_RELAYED_OFFER
        }
        ServerEvent::Answer(f) => {
            data.insert("sdp".to_string(), f.sdp.clone());
            data.insert(FIELD_SOCKET_ID.to_string(), peer_value(&f.from));
            EVENT_RELAYED_ANSWER
        }
    };

    Envelope {
        event_name: name.to_string(),
        data,
    }
}

fn peer_value(peer: &PeerId) -> Value {
    Value::String(peer.as_str().to_string())
}

fn require_str(
    event: &'static str,
    field: &'static str,
    data: &Map<String, Value>,
) -> Result<String, ProtocolError> {
    match data.get(field) {
        None => Err(ProtocolError::MissingField { event, field }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ProtocolError::InvalidField { event, field }),
    }
}

fn require_target(
    event: &'static str,
    data: &Map<String, Value>,
) -> Result<PeerId, ProtocolError> {
    require_str(event, FIELD_SOCKET_ID, data).map(PeerId::new)
}

/// Fields the relay forwards without interpreting; absent means null.
fn opaque(data: &Map<String, Value>, field: &str) -> Value {
    data.get(field).cloned().unwrap_or(Value::Null)
}
