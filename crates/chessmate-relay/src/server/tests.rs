//! End-to-end tests over real WebSocket connections.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::*;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_relay() -> (SocketAddr, Matchmaker) {
    start_relay_with(ServerConfig::default()).await
}

async fn start_relay_with(config: ServerConfig) -> (SocketAddr, Matchmaker) {
    let config = ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        ..config
    };
    let matchmaker = Matchmaker::new();
    let (addr, _task) = spawn(config, matchmaker.clone()).await.unwrap();
    (addr, matchmaker)
}

async fn open(addr: SocketAddr) -> Client {
    let (ws, _) = connect_async(format!("ws://{addr}/game")).await.unwrap();
    ws
}

async fn send_json(client: &mut Client, value: Value) {
    client
        .send(Message::Text(value.to_string().into()))
        .await
        .unwrap();
}

/// Next text frame as JSON, skipping control frames.
async fn recv_json(client: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

/// Wait until the server closes the connection.
async fn expect_closed(client: &mut Client) {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for close");
        match frame {
            None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return,
            Some(Ok(Message::Text(text))) => panic!("unexpected message {text}"),
            Some(Ok(_)) => {}
        }
    }
}

/// Poll until the matchmaker has `n` connections waiting.
async fn wait_for_waiting(matchmaker: &Matchmaker, n: usize) {
    for _ in 0..100 {
        if matchmaker.stats().await.waiting == n {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("never reached {n} waiting connections");
}

#[tokio::test]
async fn full_game_scenario() {
    let (addr, matchmaker) = start_relay().await;
    let mut one = open(addr).await;
    let mut two = open(addr).await;

    send_json(&mut one, json!({"type": "join", "playerId": "test-player-1"})).await;
    wait_for_waiting(&matchmaker, 1).await;
    send_json(&mut two, json!({"type": "join"})).await;

    let start_one = recv_json(&mut one).await;
    let start_two = recv_json(&mut two).await;
    assert_eq!(start_one["type"], "start");
    assert_eq!(start_one["color"], "white");
    assert_eq!(start_two["type"], "start");
    assert_eq!(start_two["color"], "black");

    // Each side is told the other's id.
    let snap = matchmaker.snapshot().await;
    let id_one = start_two["opponentId"].as_str().unwrap();
    let id_two = start_one["opponentId"].as_str().unwrap();
    assert_ne!(id_one, id_two);
    assert_eq!(
        snap.peers.get(&chessmate_common::ConnectionId::from(id_one)).map(|p| p.as_str()),
        Some(id_two)
    );

    send_json(
        &mut one,
        json!({"type": "move", "from": {"row": 6, "col": 4}, "to": {"row": 4, "col": 4}}),
    )
    .await;
    assert_eq!(
        recv_json(&mut two).await,
        json!({"type": "opponentMove", "from": {"row": 6, "col": 4}, "to": {"row": 4, "col": 4}})
    );

    one.close(None).await.unwrap();
    assert_eq!(recv_json(&mut two).await, json!({"type": "gameOver", "winner": "you"}));
    expect_closed(&mut two).await;
}

#[tokio::test]
async fn malformed_and_unknown_messages_are_ignored() {
    let (addr, matchmaker) = start_relay().await;
    let mut client = open(addr).await;

    client.send(Message::Text("not json".into())).await.unwrap();
    send_json(&mut client, json!({"no_type": true})).await;
    send_json(&mut client, json!({"type": "resign"})).await;
    send_json(&mut client, json!({"type": "move", "x": 1})).await;
    send_json(&mut client, json!({"type": "join"})).await;

    // Still connected and now queued.
    wait_for_waiting(&matchmaker, 1).await;
}

#[tokio::test]
async fn disconnect_while_waiting_leaves_queue_empty() {
    let (addr, matchmaker) = start_relay().await;
    let mut client = open(addr).await;
    send_json(&mut client, json!({"type": "join"})).await;
    wait_for_waiting(&matchmaker, 1).await;

    client.close(None).await.unwrap();
    wait_for_waiting(&matchmaker, 0).await;
}

#[tokio::test]
async fn upgrade_on_other_path_is_refused() {
    let (addr, _matchmaker) = start_relay().await;
    let result = connect_async(format!("ws://{addr}/elsewhere")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn idle_socket_is_dropped_after_handshake_timeout() {
    let (addr, matchmaker) = start_relay_with(ServerConfig {
        handshake_timeout_secs: 1,
        ..ServerConfig::default()
    })
    .await;

    // Connect at the TCP level and never send the upgrade request.
    let mut raw = TcpStream::connect(addr).await.unwrap();
    let mut buf = [0u8; 64];
    let read = tokio::time::timeout(Duration::from_secs(5), raw.read(&mut buf))
        .await
        .expect("server kept the idle socket open");
    // EOF or a reset both mean the server hung up.
    assert!(matches!(read, Ok(0) | Err(_)));
    assert_eq!(matchmaker.stats().await.connections, 0);
}

#[tokio::test]
async fn ping_is_answered_with_pong() {
    let (addr, _matchmaker) = start_relay().await;
    let mut client = open(addr).await;

    client
        .send(Message::Ping(vec![1, 2].into()))
        .await
        .unwrap();

    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for pong")
            .expect("stream ended")
            .unwrap();
        if let Message::Pong(payload) = frame {
            assert_eq!(payload.as_ref(), &[1u8, 2][..]);
            break;
        }
    }
}
