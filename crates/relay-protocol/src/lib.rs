//! relay-protocol
//!
//! Wire-level encoding/decoding for the signaling relay.
//!
//! This crate turns logical relay messages (`relay_core::ClientEvent` /
//! `ServerEvent`) into JSON envelope text and back again.
//!
//! - [`wire`]       : envelope shape, event-name constants
//! - [`json_codec`] : decode/encode logic

pub mod json_codec;
pub mod wire;

pub use json_codec::{decode_client, encode_server, Inbound, ProtocolError};

pub use wire::Envelope;
