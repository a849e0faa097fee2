//! Interactive relay peer for manual testing.
//!
//! Connects to a running relay, joins a room, and lets you forward
//! offers, answers, and candidates from stdin while printing everything
//! the relay delivers.

use std::env;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[tokio::main]
async fn main() -> Result<()> {
    // Where to connect: env override or default.
    let url = env::var("RELAY_PEER_URL").unwrap_or_else(|_| "ws://127.0.0.1:8080".to_string());

    println!("Connecting to {}...", url);
    let (ws, _) = connect_async(&url).await?;
    println!("Connected.");
    println!("Commands:");
    println!("  join <room>");
    println!("  offer <peerId> <sdp>");
    println!("  answer <peerId> <sdp>");
    println!("  candidate <peerId> <candidate>");
    println!("Type 'quit' or 'exit' to leave.\n");

    let (mut ws_tx, mut ws_rx) = ws.split();

    // Print everything the relay sends us.
    tokio::spawn(async move {
        while let Some(frame) = ws_rx.next().await {
            match frame {
                Ok(Message::Text(text)) => println!("<< {}", text),
                Ok(Message::Close(_)) | Err(_) => {
                    println!("Connection closed by relay.");
                    break;
                }
                Ok(_) => {}
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            println!("Exiting peer.");
            break;
        }

        let envelope = match parse_command(trimmed) {
            Some(envelope) => envelope,
            None => {
                eprintln!("Could not parse command.");
                continue;
            }
        };

        ws_tx.send(Message::Text(envelope.to_string())).await?;
    }

    Ok(())
}

fn parse_command(line: &str) -> Option<Value> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?;
    match command {
        "join" => {
            let room = parts.next()?;
            Some(json!({"eventName": "__join", "data": {"room": room}}))
        }
        "offer" => {
            let target = parts.next()?;
            let sdp = parts.collect::<Vec<_>>().join(" ");
            Some(json!({"eventName": "__offer", "data": {"socketId": target, "sdp": sdp}}))
        }
        "answer" => {
            let target = parts.next()?;
            let sdp = parts.collect::<Vec<_>>().join(" ");
            Some(json!({"eventName": "__answer", "data": {"socketId": target, "sdp": sdp}}))
        }
        "candidate" => {
            let target = parts.next()?;
            let candidate = parts.collect::<Vec<_>>().join(" ");
            Some(json!({
                "eventName": "__ice_candidate",
                "data": {"socketId": target, "label": 0, "candidate": candidate}
            }))
        }
        _ => None,
    }
}
