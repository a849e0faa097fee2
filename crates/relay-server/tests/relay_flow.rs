// crates/relay-server/tests/relay_flow.rs
//
// End-to-end tests over localhost WebSockets: a real relay instance on
// an ephemeral port, driven by real clients.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use relay_server::config::Config;
use relay_server::server::RelayServer;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

async fn start_relay_with(max_peers: usize) -> SocketAddr {
    let config = Config {
        bind_addr: "127.0.0.1".to_string(),
        port: 0,
        max_peers,
    };
    let server = RelayServer::bind(config).await.expect("bind relay");
    let addr = server.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    addr
}

async fn start_relay() -> SocketAddr {
    start_relay_with(16).await
}

async fn connect(addr: SocketAddr) -> WsClient {
    let (ws, _) = connect_async(format!("ws://{addr}"))
        .await
        .expect("connect to relay");
    ws
}

async fn send_json(ws: &mut WsClient, value: Value) {
    ws.send(Message::Text(value.to_string()))
        .await
        .expect("send frame");
}

/// Next text frame as JSON, skipping control frames.
async fn recv_json(ws: &mut WsClient) -> Value {
    loop {
        let frame = timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("connection closed")
            .expect("read frame");
        match frame {
            Message::Text(text) => return serde_json::from_str(&text).expect("frame is JSON"),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {:?}", other),
        }
    }
}

/// Join `room` and return `(own id, pre-existing member ids)` from the
/// `_peers` reply.
async fn join(ws: &mut WsClient, room: &str) -> (String, Vec<String>) {
    send_json(ws, json!({"eventName": "__join", "data": {"room": room}})).await;
    let reply = recv_json(ws).await;
    assert_eq!(reply["eventName"], "_peers");
    let you = reply["data"]["you"].as_str().expect("you is a string").to_string();
    let connections = reply["data"]["connections"]
        .as_array()
        .expect("connections is an array")
        .iter()
        .map(|v| v.as_str().expect("id is a string").to_string())
        .collect();
    (you, connections)
}

#[tokio::test]
async fn join_offer_answer_flow() {
    let addr = start_relay().await;

    let mut a = connect(addr).await;
    let (a_id, a_sees) = join(&mut a, "r1").await;
    assert!(a_sees.is_empty());

    let mut b = connect(addr).await;
    let (b_id, b_sees) = join(&mut b, "r1").await;
    assert_eq!(b_sees, vec![a_id.clone()]);
    assert_ne!(a_id, b_id);

    // A hears about B.
    let new_peer = recv_json(&mut a).await;
    assert_eq!(new_peer["eventName"], "_new_peer");
    assert_eq!(new_peer["data"]["socketId"], Value::String(b_id.clone()));

    // B offers to A; the relay rewrites socketId to B's id.
    send_json(
        &mut b,
        json!({"eventName": "__offer", "data": {"socketId": a_id, "sdp": "X"}}),
    )
    .await;
    let offer = recv_json(&mut a).await;
    assert_eq!(offer["eventName"], "_offer");
    assert_eq!(offer["data"]["sdp"], "X");
    assert_eq!(offer["data"]["socketId"], Value::String(b_id.clone()));

    // A answers back.
    send_json(
        &mut a,
        json!({"eventName": "__answer", "data": {"socketId": b_id, "sdp": "Y"}}),
    )
    .await;
    let answer = recv_json(&mut b).await;
    assert_eq!(answer["eventName"], "_answer");
    assert_eq!(answer["data"]["sdp"], "Y");
    assert_eq!(answer["data"]["socketId"], Value::String(a_id));
}

#[tokio::test]
async fn forward_to_unknown_target_leaves_relay_healthy() {
    let addr = start_relay().await;

    let mut a = connect(addr).await;
    join(&mut a, "lonely").await;

    send_json(
        &mut a,
        json!({"eventName": "__offer", "data": {"socketId": "nobody", "sdp": "X"}}),
    )
    .await;

    // No crash, no reply to the sender. A later join still routes, and
    // the only thing A ever receives is that join's notification.
    let mut b = connect(addr).await;
    let (_b_id, b_sees) = join(&mut b, "lonely").await;
    assert_eq!(b_sees.len(), 1);

    let new_peer = recv_json(&mut a).await;
    assert_eq!(new_peer["eventName"], "_new_peer");
}

#[tokio::test]
async fn undecodable_messages_do_not_break_the_connection() {
    let addr = start_relay().await;

    let mut a = connect(addr).await;
    join(&mut a, "r1").await;

    // Malformed JSON, an envelope with no event name, and an unknown
    // event are all dropped without closing the connection.
    a.send(Message::Text("{not json".to_string())).await.unwrap();
    send_json(&mut a, json!({"data": {"room": "r1"}})).await;
    send_json(&mut a, json!({"eventName": "__dance", "data": {}})).await;

    let mut b = connect(addr).await;
    join(&mut b, "r1").await;

    let new_peer = recv_json(&mut a).await;
    assert_eq!(new_peer["eventName"], "_new_peer");
}

#[tokio::test]
async fn disconnect_evicts_peer_from_registry_and_room() {
    let addr = start_relay().await;

    let mut a = connect(addr).await;
    let (a_id, _) = join(&mut a, "r1").await;

    let mut b = connect(addr).await;
    let (b_id, b_sees) = join(&mut b, "r1").await;
    assert_eq!(b_sees, vec![a_id]);
    recv_json(&mut a).await; // _new_peer for b

    a.close(None).await.expect("close a");
    drop(a);

    // Give the relay a moment to tear the endpoint down.
    sleep(Duration::from_millis(300)).await;

    let mut c = connect(addr).await;
    let (_c_id, c_sees) = join(&mut c, "r1").await;
    assert_eq!(c_sees, vec![b_id]);
}

#[tokio::test]
async fn oversized_message_closes_the_connection() {
    let addr = start_relay().await;

    let mut a = connect(addr).await;
    join(&mut a, "r1").await;

    let big_room = "x".repeat(600);
    send_json(&mut a, json!({"eventName": "__join", "data": {"room": big_room}})).await;

    let outcome = timeout(RECV_TIMEOUT, a.next())
        .await
        .expect("timed out waiting for close");
    match outcome {
        None | Some(Err(_)) | Some(Ok(Message::Close(_))) => {}
        Some(Ok(other)) => panic!("expected the connection to close, got {:?}", other),
    }
}

#[tokio::test]
async fn peer_cap_rejects_excess_connections() {
    let addr = start_relay_with(1).await;

    let mut a = connect(addr).await;
    join(&mut a, "r1").await;

    // The second connection is dropped before the handshake completes.
    let second = connect_async(format!("ws://{addr}")).await;
    assert!(second.is_err());

    // The first peer is unaffected.
    send_json(
        &mut a,
        json!({"eventName": "__offer", "data": {"socketId": "nobody", "sdp": "X"}}),
    )
    .await;
    a.close(None).await.expect("clean close");
}
