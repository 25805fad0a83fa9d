//! Per-connection handler: register, pump frames both ways, then leave.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use chessmate_common::ConnectionId;

use crate::handle::{ConnectionHandle, Outbound};
use crate::matchmaker::Matchmaker;
use crate::protocol;

/// Handle a single WebSocket connection until either side closes it.
pub async fn handle_connection(
    ws: WebSocketStream<TcpStream>,
    addr: SocketAddr,
    matchmaker: Matchmaker,
    outbound_queue: usize,
) {
    let id = ConnectionId::new();
    let (mut sink, mut stream) = ws.split();

    let (handle, mut outbound) = ConnectionHandle::channel(id.clone(), outbound_queue);
    matchmaker.register(handle).await;
    tracing::info!(connection = %id, peer = %addr, "Connection established");

    loop {
        tokio::select! {
            // Instructions from the matchmaker -> this client's WebSocket
            instruction = outbound.recv() => {
                match instruction {
                    Some(Outbound::Message(message)) => {
                        let json = match message.to_json() {
                            Ok(json) => json,
                            Err(e) => {
                                tracing::warn!(connection = %id, error = %e, "Dropping unserializable message");
                                continue;
                            }
                        };
                        if sink.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    // Close requested, or the matchmaker already forgot us.
                    Some(Outbound::Close) | None => {
                        let _ = sink.send(Message::Close(None)).await;
                        tracing::debug!(connection = %id, "Closed by relay");
                        break;
                    }
                }
            }

            // Frames from this client's WebSocket -> matchmaker
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => match protocol::decode(&text) {
                        Ok(message) => matchmaker.dispatch(&id, message).await,
                        Err(e) => {
                            tracing::debug!(connection = %id, error = %e, "Ignoring malformed message");
                        }
                    },
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(connection = %id, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    matchmaker.leave(&id).await;
    tracing::info!(connection = %id, peer = %addr, "Connection closed");
}
