// crates/relay-protocol/tests/envelope_format.rs

use relay_core::{ClientEvent, PeerId, ServerEvent};
use relay_protocol::{decode_client, encode_server, Inbound, ProtocolError};
use serde_json::{json, Value};

fn pid(s: &str) -> PeerId {
    PeerId::new(s)
}

fn decode(value: Value) -> Result<Inbound, ProtocolError> {
    decode_client(value.to_string().as_bytes())
}

#[test]
fn decodes_a_join_event() {
    let inbound = decode(json!({"eventName": "__join", "data": {"room": "r1"}})).unwrap();
    assert_eq!(inbound, Inbound::Event(ClientEvent::join("r1")));
}

#[test]
fn decodes_an_offer_addressed_to_a_target() {
    let inbound = decode(json!({
        "eventName": "__offer",
        "data": {"socketId": "a", "sdp": "v=0..."}
    }))
    .unwrap();
    assert_eq!(
        inbound,
        Inbound::Event(ClientEvent::offer(pid("a"), json!("v=0...")))
    );
}

#[test]
fn decodes_an_answer_addressed_to_a_target() {
    let inbound = decode(json!({
        "eventName": "__answer",
        "data": {"socketId": "b", "sdp": "v=0..."}
    }))
    .unwrap();
    assert_eq!(
        inbound,
        Inbound::Event(ClientEvent::answer(pid("b"), json!("v=0...")))
    );
}

#[test]
fn decodes_an_ice_candidate_with_opaque_fields() {
    let inbound = decode(json!({
        "eventName": "__ice_candidate",
        "data": {"socketId": "a", "label": 2, "candidate": {"sdpMid": "0"}}
    }))
    .unwrap();
    assert_eq!(
        inbound,
        Inbound::Event(ClientEvent::ice_candidate(
            pid("a"),
            json!(2),
            json!({"sdpMid": "0"})
        ))
    );
}

#[test]
fn absent_forwarded_fields_become_null() {
    let inbound = decode(json!({
        "eventName": "__ice_candidate",
        "data": {"socketId": "a"}
    }))
    .unwrap();
    assert_eq!(
        inbound,
        Inbound::Event(ClientEvent::ice_candidate(
            pid("a"),
            Value::Null,
            Value::Null
        ))
    );
}

#[test]
fn unknown_event_names_are_ignored_not_errors() {
    let inbound = decode(json!({"eventName": "__dance", "data": {}})).unwrap();
    assert_eq!(
        inbound,
        Inbound::Ignored {
            event: "__dance".to_string()
        }
    );
}

#[test]
fn envelope_without_event_name_is_opaque() {
    let err = decode(json!({"data": {"room": "r1"}})).unwrap_err();
    assert!(matches!(err, ProtocolError::MissingEventName));

    // Non-object JSON is classified the same way.
    let err = decode(json!([1, 2, 3])).unwrap_err();
    assert!(matches!(err, ProtocolError::MissingEventName));
}

#[test]
fn malformed_json_is_rejected() {
    let err = decode_client(b"{not json").unwrap_err();
    assert!(matches!(err, ProtocolError::Malformed(_)));
}

#[test]
fn join_without_a_room_is_rejected() {
    let err = decode(json!({"eventName": "__join", "data": {}})).unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::MissingField {
            event: "__join",
            field: "room"
        }
    ));

    let err = decode(json!({"eventName": "__join", "data": {"room": 7}})).unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::InvalidField {
            event: "__join",
            field: "room"
        }
    ));
}

#[test]
fn forward_without_a_target_is_rejected() {
    let err = decode(json!({"eventName": "__offer", "data": {"sdp": "X"}})).unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::MissingField {
            event: "__offer",
            field: "socketId"
        }
    ));
}

#[test]
fn encoded_peers_event_has_the_wire_shape() {
    let event = ServerEvent::peers(vec![pid("a"), pid("b")], pid("c"));
    let text = encode_server(&event).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["eventName"], "_peers");
    assert_eq!(value["data"]["connections"], json!(["a", "b"]));
    assert_eq!(value["data"]["you"], "c");
}

#[test]
fn encoded_new_peer_event_names_the_joiner() {
    let text = encode_server(&ServerEvent::new_peer(pid("a"))).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["eventName"], "_new_peer");
    assert_eq!(value["data"]["socketId"], "a");
}

#[test]
fn encoded_forwards_carry_the_senders_id() {
    let text = encode_server(&ServerEvent::offer(json!("X"), pid("b"))).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["eventName"], "_offer");
    assert_eq!(value["data"]["sdp"], "X");
    assert_eq!(value["data"]["socketId"], "b");

    let text = encode_server(&ServerEvent::answer(json!("Y"), pid("a"))).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["eventName"], "_answer");
    assert_eq!(value["data"]["sdp"], "Y");
    assert_eq!(value["data"]["socketId"], "a");

    let text =
        encode_server(&ServerEvent::ice_candidate(json!(1), json!("c"), pid("a"))).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["eventName"], "_ice_candidate");
    assert_eq!(value["data"]["label"], 1);
    assert_eq!(value["data"]["candidate"], "c");
    assert_eq!(value["data"]["socketId"], "a");
}
