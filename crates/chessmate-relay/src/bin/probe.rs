//! chessmate-probe: minimal client for poking at a running relay.
//!
//! Connects, asks for a game, prints everything the relay sends, plays one
//! sample move when the game starts, and exits on `gameOver`.

use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use chessmate_relay::ServerMessage;

#[derive(Parser)]
#[command(name = "chessmate-probe", about = "Test client for chessmate-relay")]
struct Args {
    /// Relay WebSocket URL.
    #[arg(long, default_value = "ws://localhost:8080/game")]
    url: String,

    /// Player id sent along with the join request.
    #[arg(long, default_value = "probe")]
    player_id: String,

    /// Do not play the sample move; just wait for the game to end.
    #[arg(long)]
    stay: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chessmate_probe=info".into()),
        )
        .init();

    let args = Args::parse();

    let (ws, _) = match connect_async(args.url.as_str()).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(url = %args.url, error = %e, "Failed to connect");
            std::process::exit(1);
        }
    };
    tracing::info!(url = %args.url, "Connected");
    let (mut sink, mut stream) = ws.split();

    let join = json!({"type": "join", "playerId": args.player_id});
    if let Err(e) = sink.send(Message::Text(join.to_string().into())).await {
        tracing::error!(error = %e, "Failed to send join");
        std::process::exit(1);
    }
    tracing::info!("Sent join request");

    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "Connection error");
                break;
            }
        };

        let message = match serde_json::from_str::<ServerMessage>(&text) {
            Ok(message) => message,
            Err(_) => {
                tracing::info!(raw = %text.as_str(), "Unrecognized message");
                continue;
            }
        };

        match message {
            ServerMessage::Start { color, opponent_id } => {
                tracing::info!(?color, opponent = %opponent_id, "Game started");
                if !args.stay {
                    let mv = json!({"type": "move", "from": {"row": 6, "col": 4}, "to": {"row": 4, "col": 4}});
                    if sink.send(Message::Text(mv.to_string().into())).await.is_err() {
                        break;
                    }
                    tracing::info!(%mv, "Sent move");
                }
            }
            ServerMessage::OpponentMove(fields) => {
                tracing::info!(fields = %serde_json::Value::Object(fields), "Opponent moved");
            }
            ServerMessage::GameOver { winner } => {
                tracing::info!(?winner, "Game over");
                break;
            }
        }
    }

    let _ = sink.close().await;
}
