//! Per-connection I/O: the read pump and the write pump.
//!
//! Each connection runs exactly two tasks:
//! - the **read pump** decodes inbound frames and feeds the router;
//! - the **write pump** drains the peer's outbound queue onto the socket
//!   and keeps the connection alive with periodic pings.
//!
//! The pumps share nothing but the outbound queue and the split socket
//! halves; only the write pump ever writes to the wire.

use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use relay_core::PeerId;
use relay_protocol::{decode_client, Inbound, ProtocolError};
use tokio::net::TcpStream;
use tokio::time::{interval_at, timeout, Instant};
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, info, warn};

use crate::registry::PeerRegistry;
use crate::types::{OutboundRx, RouterCommand, RouterTx};

/// Time allowed for a single write to complete. Exceeding it is fatal
/// for the connection, not retried.
const WRITE_WAIT: Duration = Duration::from_secs(10);

/// Liveness window: how long a peer may stay silent at the protocol
/// level before the transport gives up on it.
const PONG_WAIT: Duration = Duration::from_secs(60);

/// Ping period; must be shorter than `PONG_WAIT`.
const PING_PERIOD: Duration = Duration::from_secs(PONG_WAIT.as_secs() * 9 / 10);

/// Maximum inbound message size in bytes. Larger frames are a protocol
/// violation and close the connection.
const MAX_MESSAGE_SIZE: usize = 512;

/// Run the I/O loops for a single peer connection.
///
/// Performs the WebSocket handshake, spawns the write pump, then runs
/// the read pump to completion. On the way out the peer is removed from
/// the registry and detached from the router, whatever the exit reason.
pub(crate) async fn run_peer(
    peer_id: PeerId,
    stream: TcpStream,
    router_tx: RouterTx,
    out_rx: OutboundRx,
    registry: PeerRegistry,
) -> Result<()> {
    let result = serve(&peer_id, stream, &router_tx, out_rx).await;

    // Teardown runs exactly once, on every exit path: evict from the
    // delivery registry first (closing the outbound queue), then from
    // the router's peer and room state.
    registry.unregister(&peer_id).await;
    let _ = router_tx.send(RouterCommand::Detach(peer_id));

    result
}

async fn serve(
    peer_id: &PeerId,
    stream: TcpStream,
    router_tx: &RouterTx,
    out_rx: OutboundRx,
) -> Result<()> {
    let mut ws_config = WebSocketConfig::default();
    ws_config.max_message_size = Some(MAX_MESSAGE_SIZE);
    ws_config.max_frame_size = Some(MAX_MESSAGE_SIZE);

    let ws = tokio_tungstenite::accept_async_with_config(stream, Some(ws_config))
        .await
        .context("websocket handshake failed")?;

    let (ws_tx, mut ws_rx) = ws.split();

    let mut writer = tokio::spawn(write_pump(peer_id.clone(), ws_tx, out_rx));

    // Read pump: one message at a time until the transport ends.
    loop {
        tokio::select! {
            // The write pump only finishes on a failed or overdue write
            // (or after saying goodbye). Dropping our stream half here
            // closes the socket for good.
            _ = &mut writer => {
                debug!(peer = %peer_id, "write pump ended, closing connection");
                break;
            }
            next = ws_rx.next() => {
                let frame = match next {
                    Some(Ok(frame)) => frame,
                    Some(Err(e)) => {
                        // Covers transport failures and oversized frames;
                        // both end this connection and nothing else.
                        debug!(peer = %peer_id, error = %e, "read failed, closing connection");
                        break;
                    }
                    None => break,
                };

                match frame {
                    Message::Text(text) => handle_frame(peer_id, text.as_bytes(), router_tx)?,
                    Message::Binary(bytes) => handle_frame(peer_id, &bytes, router_tx)?,
                    Message::Close(_) => {
                        debug!(peer = %peer_id, "peer sent close frame");
                        break;
                    }
                    Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
                }
            }
        }
    }

    Ok(())
}

/// Decode one inbound frame and hand it to the router.
///
/// Only a vanished router task is fatal; every decode problem is logged
/// and dropped, and the connection stays open.
fn handle_frame(peer_id: &PeerId, bytes: &[u8], router_tx: &RouterTx) -> Result<()> {
    match decode_client(bytes) {
        Ok(Inbound::Event(event)) => {
            router_tx
                .send(RouterCommand::Event {
                    peer: peer_id.clone(),
                    event,
                })
                .context("router task is gone")?;
        }
        Ok(Inbound::Ignored { event }) => {
            debug!(peer = %peer_id, event = %event, "ignoring unrecognized event");
        }
        Err(ProtocolError::MissingEventName) => {
            info!(
                peer = %peer_id,
                message = %String::from_utf8_lossy(bytes),
                "opaque inbound message"
            );
        }
        Err(e) => {
            warn!(peer = %peer_id, error = %e, "dropping undecodable message");
        }
    }
    Ok(())
}

/// Drain the outbound queue onto the socket, pinging on an interval to
/// keep the connection alive.
///
/// Exits when the queue closes (sending a close frame first) or when any
/// write fails or overruns `WRITE_WAIT`. Either way the sink is dropped,
/// which ends the connection and, with it, the read pump.
async fn write_pump(
    peer_id: PeerId,
    mut ws_tx: SplitSink<WebSocketStream<TcpStream>, Message>,
    mut out_rx: OutboundRx,
) {
    let mut ticker = interval_at(Instant::now() + PING_PERIOD, PING_PERIOD);

    loop {
        tokio::select! {
            maybe = out_rx.recv() => match maybe {
                Some(frame) => {
                    if !send_with_deadline(&peer_id, &mut ws_tx, frame).await {
                        break;
                    }
                }
                None => {
                    // Queue closed: the peer was unregistered.
                    let _ = timeout(WRITE_WAIT, ws_tx.send(Message::Close(None))).await;
                    break;
                }
            },
            _ = ticker.tick() => {
                if !send_with_deadline(&peer_id, &mut ws_tx, Message::Ping(Vec::new())).await {
                    break;
                }
            }
        }
    }
}

async fn send_with_deadline(
    peer_id: &PeerId,
    ws_tx: &mut SplitSink<WebSocketStream<TcpStream>, Message>,
    frame: Message,
) -> bool {
    match timeout(WRITE_WAIT, ws_tx.send(frame)).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            debug!(peer = %peer_id, error = %e, "write failed");
            false
        }
        Err(_) => {
            warn!(peer = %peer_id, "write deadline exceeded");
            false
        }
    }
}
