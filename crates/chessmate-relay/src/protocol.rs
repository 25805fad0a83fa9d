//! Relay wire protocol.
//!
//! Client frames are decoded once, here, into `ClientMessage`. The relay only
//! looks at the `type` discriminator; everything else in a move is carried as
//! an opaque field bag and handed to the opponent untouched.

use serde::{Deserialize, Serialize};

use chessmate_common::{ConnectionId, RelayError};

/// Every field of a move payload except `type`.
pub type MoveFields = serde_json::Map<String, serde_json::Value>;

/// Messages a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Ask to be paired. Extra fields (e.g. `playerId`) are ignored.
    #[serde(rename = "join")]
    Join,

    #[serde(rename = "move")]
    Move(MoveFields),

    #[serde(other)]
    Unknown,
}

/// Side a player plays. The connection that waited first is white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    You,
}

/// Messages the relay sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "start")]
    Start {
        color: Color,
        #[serde(rename = "opponentId")]
        opponent_id: ConnectionId,
    },

    #[serde(rename = "opponentMove")]
    OpponentMove(MoveFields),

    #[serde(rename = "gameOver")]
    GameOver { winner: Winner },
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, RelayError> {
        serde_json::to_string(self).map_err(|e| RelayError::Protocol(e.to_string()))
    }
}

/// Decode a text frame. Missing or non-string `type` and invalid JSON are
/// errors; an unrecognized `type` decodes to `ClientMessage::Unknown`.
pub fn decode(text: &str) -> Result<ClientMessage, RelayError> {
    serde_json::from_str(text).map_err(|e| RelayError::Protocol(e.to_string()))
}
